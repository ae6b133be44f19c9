fn main() {
    if let Err(e) = vmd_bootstrap::run_cli() {
        vmd_bootstrap::report_error(&e, &mut std::io::stderr());
        std::process::exit(vmd_bootstrap::exit_code(&e));
    }
}
