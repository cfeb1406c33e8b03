use std::io;

fn main() {
    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();
    let code = coup_cli::run(std::env::args(), &mut out, &mut err);
    std::process::exit(code);
}
