//! Command-line options and logging setup

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "flappy-term")]
#[command(about = "Flappy Bird in your terminal: Space or click to jump, R to restart, Q to quit", long_about = None)]
pub struct Args {
    /// Seed for pipe gap placement (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable sound
    #[arg(long, default_value_t = false)]
    pub mute: bool,
}

impl Args {
    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

/// Log to stderr, silent unless `RUST_LOG` is set since stderr shares the
/// terminal with the game.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("off");
    let _ = env_logger::Builder::from_env(env).format_timestamp_millis().try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let args = Args::try_parse_from(["flappy-term"]).unwrap();
        assert_eq!(args.seed, None);
        assert!(!args.mute);
    }

    #[test]
    fn test_seed_and_mute() {
        let args = Args::try_parse_from(["flappy-term", "--seed", "42", "--mute"]).unwrap();
        assert_eq!(args.seed_or_random(), 42);
        assert!(args.mute);
    }

    #[test]
    fn test_rejects_bad_seed() {
        assert!(Args::try_parse_from(["flappy-term", "--seed", "abc"]).is_err());
    }
}
