//! CLI for restartcheck: the SP 800-90B restart test on a file of samples.

mod report;

use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use log::info;
use restartcheck_core::{
    DataClass, RestartConfig, RestartError, load_samples, run_restart_test,
};

#[derive(Parser)]
#[command(name = "restartcheck")]
#[command(about = "Restart test (SP 800-90B Section 3.1.4) over 1000 restarts of 1000 samples")]
#[command(version = restartcheck_core::VERSION)]
#[command(group(ArgGroup::new("class").required(true).args(["iid", "non_iid"])))]
#[command(after_help = "\
Restart samples are packed one per byte; the rightmost BITS_PER_WORD bits of each byte
form the sample. If fewer than 2^BITS_PER_WORD symbols occur, the alphabet is mapped down
to 0, 1, ..., alphabet_size - 1 in ascending order of the original values.

If the data passes the sanity check and the validation test, min(H_r, H_c, H_I) is
reported: the validated entropy assessment, or the basis for h_in when conditioning.")]
struct Cli {
    /// Binary file with at least 1,000,000 samples, one per byte
    file: PathBuf,

    /// Bits per sample, 1 to 8
    bits_per_word: u8,

    /// Initial entropy estimate H_I, 0 to BITS_PER_WORD
    #[arg(allow_negative_numbers = true)]
    h_initial: f64,

    /// The samples are IID
    #[arg(short = 'i', long)]
    iid: bool,

    /// The samples are not IID: run the full non-IID estimator battery
    #[arg(short = 'n', long)]
    non_iid: bool,

    /// Print every estimate and details about the input
    #[arg(short, long)]
    verbose: bool,

    /// Also write the full report as JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Assess rows and columns one after the other instead of concurrently
    #[arg(long)]
    sequential: bool,
}

impl Cli {
    fn config(&self) -> RestartConfig {
        let data_class = if self.iid {
            DataClass::Iid
        } else {
            DataClass::NonIid
        };
        let config = RestartConfig::new(self.bits_per_word, self.h_initial, data_class);
        if self.sequential {
            config.sequential()
        } else {
            config
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let config = cli.config();
    if let Err(e) = config.validate() {
        eprintln!("{e}");
        std::process::exit(1);
    }

    if cli.verbose {
        println!("Opening file: '{}'", cli.file.display());
    }
    let samples = match load_samples(&cli.file, config.word_size) {
        Ok(samples) => samples,
        Err(e) => {
            eprintln!("Error reading file: {e}");
            std::process::exit(1);
        }
    };
    if cli.verbose && samples.alphabet_size() > 1 {
        print!(
            "{}",
            report::render_samples(
                samples.len().min(config.sample_count()),
                samples.alphabet_size(),
                samples.was_remapped(),
            )
        );
        println!();
    }

    println!("H_I: {:.6}", config.initial_entropy);

    let report = match run_restart_test(samples, &config) {
        Ok(report) => report,
        Err(RestartError::SanityCheckFailed {
            alpha,
            tail_probability,
            ..
        }) => {
            println!(
                "\n*** Restart Sanity Check Failed; ALPHA: {alpha:.6}, TAIL PROB: {tail_probability:.6} ***"
            );
            std::process::exit(1);
        }
        Err(RestartError::SingleSymbolAlphabet) => {
            println!("Symbol alphabet consists of 1 symbol. No entropy awarded...");
            std::process::exit(1);
        }
        Err(RestartError::InsufficientSamples { required, .. }) => {
            println!("\n*** Error: data contains less than {required} samples ***\n");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    print!("{}", report::render(&report, cli.verbose));

    if let Some(path) = &cli.output {
        match report.to_json() {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => info!("report written to {}", path.display()),
                Err(e) => eprintln!("\nFailed to write {}: {e}", path.display()),
            },
            Err(e) => eprintln!("\nFailed to serialize report: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_reference_argument_order() {
        let cli = Cli::try_parse_from(["restartcheck", "data.bin", "8", "7.5", "-n", "-v"]).unwrap();
        assert_eq!(cli.bits_per_word, 8);
        assert_eq!(cli.h_initial, 7.5);
        assert!(cli.verbose);
        let config = cli.config();
        assert_eq!(config.data_class, DataClass::NonIid);
        assert!(config.parallel);
    }

    #[test]
    fn iid_flag_and_sequential() {
        let cli =
            Cli::try_parse_from(["restartcheck", "d.bin", "1", "1.0", "-i", "--sequential"]).unwrap();
        let config = cli.config();
        assert_eq!(config.data_class, DataClass::Iid);
        assert!(!config.parallel);
    }

    #[test]
    fn data_class_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["restartcheck", "d.bin", "1", "1.0"]).is_err());
        assert!(Cli::try_parse_from(["restartcheck", "d.bin", "1", "1.0", "-i", "-n"]).is_err());
    }

    #[test]
    fn negative_entropy_reaches_validation() {
        let cli = Cli::try_parse_from(["restartcheck", "d.bin", "4", "-1", "-i"]).unwrap();
        assert!(matches!(
            cli.config().validate(),
            Err(RestartError::InvalidInitialEntropy { .. })
        ));
    }

    #[test]
    fn out_of_range_word_size_reaches_validation() {
        let cli = Cli::try_parse_from(["restartcheck", "d.bin", "9", "1", "-n"]).unwrap();
        assert!(matches!(
            cli.config().validate(),
            Err(RestartError::InvalidWordSize(9))
        ));
    }
}
