use kvpipe::{println_err, run};

fn main() {
    let args = std::env::args().skip(1).peekable();
    if let Err(err) = run(args) {
        println_err!("{err}");
        std::process::exit(err.code());
    }
}
