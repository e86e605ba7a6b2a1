// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// The four subcommands and their flags. Most settings live in
// the YAML config; flags here only override it.

use clap::{Args, Subcommand};

use crate::domain::record::{validate_hours, Difficulty};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the model on the dataset and save the artifact
    Train,

    /// Score the saved model on the held-out test split
    Evaluate,

    /// Predict the score for one student
    Predict(PredictArgs),

    /// Serve predictions over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Hours studied as a decimal (e.g. 4.5)
    #[arg(long, value_parser = parse_hours)]
    pub hours: f64,

    /// Exam difficulty category: Easy, Medium or Hard
    #[arg(long, default_value = "Medium")]
    pub difficulty: Difficulty,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port (overrides server.port)
    #[arg(long)]
    pub port: Option<u16>,
}

fn parse_hours(s: &str) -> Result<f64, String> {
    let hours: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    validate_hours(hours).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_parses_predict() {
        let cli = Cli::try_parse_from(["score-predictor", "predict", "--hours", "4.5", "--difficulty", "Hard"]).unwrap();
        match cli.command {
            Commands::Predict(args) => {
                assert_eq!(args.hours, 4.5);
                assert_eq!(args.difficulty, Difficulty::Hard);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_predict_defaults_to_medium() {
        let cli = Cli::try_parse_from(["score-predictor", "predict", "--hours", "2"]).unwrap();
        match cli.command {
            Commands::Predict(args) => assert_eq!(args.difficulty, Difficulty::Medium),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_predict_args() {
        assert!(Cli::try_parse_from(["score-predictor", "predict"]).is_err());
        assert!(Cli::try_parse_from(["score-predictor", "predict", "--hours", "-1"]).is_err());
        assert!(Cli::try_parse_from(["score-predictor", "predict", "--hours", "2", "--difficulty", "Extreme"]).is_err());
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::try_parse_from([
            "score-predictor", "serve", "--port", "8080", "--config", "my.yaml", "--model-path", "out/m",
        ])
        .unwrap();
        assert_eq!(cli.config, std::path::PathBuf::from("my.yaml"));
        assert_eq!(cli.model_path, Some(std::path::PathBuf::from("out/m")));
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.port, Some(8080)),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
