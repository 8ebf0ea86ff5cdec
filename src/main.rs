use wisp::cli::cli;

fn main() {
    cli();
}
