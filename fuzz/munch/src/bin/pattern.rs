fn main() {
    afl::fuzz!(|data: String| fuzz_munch::run_pattern(&data));
}
