fn main() {
    if let Err(err) = ola_clean::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
