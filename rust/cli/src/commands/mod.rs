//! Command handlers, one module per subcommand.
//!
//! Each module exposes `handle_<name>_command(...) -> Result<(), CliError>`
//! and takes its output streams as `&mut dyn Write` so tests can capture them.

pub mod cfg;
pub mod deal;
pub mod odds;
pub mod roads;
pub mod sim;
pub mod tableau;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use odds::handle_odds_command;
pub use roads::handle_roads_command;
pub use sim::handle_sim_command;
pub use tableau::handle_tableau_command;
