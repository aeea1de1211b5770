use fuzz_munch::LexInput;

fn main() {
    afl::fuzz!(|data: LexInput| data.run());
}
