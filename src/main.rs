use std::process::ExitCode;

use projectile_range::backend::Backend;
use projectile_range::harness::{HarnessConfig, run};

const BANNER_RULE: &str = "********************************************";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = HarnessConfig::for_backend(Backend::preferred());
    let report = match run(&config) {
        Ok(report) => report,
        Err(e) => {
            println!("Failure: {e}");
            return ExitCode::from(2);
        }
    };

    for p in &report.parallel {
        println!("Parallel {p}");
    }

    if report.passed() {
        println!("{BANNER_RULE}Success..The Results are matched{BANNER_RULE}");
        ExitCode::SUCCESS
    } else {
        println!("{BANNER_RULE}Failed{BANNER_RULE}");
        ExitCode::from(1)
    }
}
