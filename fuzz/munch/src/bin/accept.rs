use fuzz_munch::AcceptInput;

fn main() {
    afl::fuzz!(|data: AcceptInput| data.run());
}
