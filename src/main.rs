use std::process::exit;

fn main() {
    if let Err(e) = storedash::app::run_cli() {
        storedash::app::print_error(&e);
        exit(1);
    }
}
