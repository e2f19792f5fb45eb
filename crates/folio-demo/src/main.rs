#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = folio_demo::run_from_env() {
        eprintln!("error: {error}");
        std::process::exit(error.exit_code());
    }
}
