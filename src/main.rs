fn main() {
    if let Err(err) = sheet_reconcile::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
