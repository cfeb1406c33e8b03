use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "coup",
    version,
    about = "Baccarat tableau, odds and scoreboard roads"
)]
pub struct CoupCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up the third-card rule for two-card totals
    Tableau {
        /// Player two-card total (0-9)
        #[arg(long)]
        player: u8,
        /// Banker two-card total (0-9)
        #[arg(long)]
        banker: u8,
        /// Point value (0-9) of the player's third card, if dealt
        #[arg(long)]
        third: Option<u8>,
        #[arg(long)]
        json: bool,
    },
    /// Enumerate the outcomes of a partially dealt coup
    Odds {
        /// Player cards, comma separated; `?` unknown, `-` no card (e.g. `K,4,?`)
        #[arg(long, default_value = "")]
        player: String,
        /// Banker cards in the same form
        #[arg(long, default_value = "")]
        banker: String,
        #[arg(long)]
        json: bool,
    },
    /// Draw the bead, big, big-eye and small roads for a result sequence
    Roads {
        /// Results such as `BBPTP` (P = player, B = banker, T = tie)
        #[arg(long)]
        results: String,
        #[arg(long)]
        json: bool,
    },
    /// Deal a single coup from a seeded shoe
    Deal {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        json: bool,
    },
    /// Simulate many coups and summarize the roads
    Sim {
        #[arg(long)]
        rounds: Option<u64>,
        #[arg(long)]
        seed: Option<u64>,
        /// Write one JSONL round record per coup
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}
