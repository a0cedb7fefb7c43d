//! `dmsplot` binary entry point.

fn main() {
    if let Err(e) = dms_cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
