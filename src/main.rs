fn main() {
    if let Err(err) = workflow_diagram::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
