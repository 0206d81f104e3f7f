fn main() {
    if let Err(e) = prism::run() {
        eprintln!("prism: {e}");
        std::process::exit(1);
    }
}
