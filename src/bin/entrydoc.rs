fn main() {
    entrydoc::cli::run();
}
