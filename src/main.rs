fn main() {
    caselist::cli::run();
}
