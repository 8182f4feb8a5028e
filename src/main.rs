use se_extract::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", cli::failure_message(&e));
        std::process::exit(1);
    }
}
