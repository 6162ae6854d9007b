fn main() {
    if let Err(err) = credview::cli::run() {
        credview::ui::eprintln_error(&err);
        std::process::exit(credview::exit::exit_code(&err));
    }
}
