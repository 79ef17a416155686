fn main() {
    vmharness::cli::run();
}
