use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match ksc_drv::Config::from_args(&args) {
        Ok(config) => ExitCode::from(ksc_drv::run(&config) as u8),
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::from(ksc_drv::EXIT_IO as u8)
        },
    }
}
