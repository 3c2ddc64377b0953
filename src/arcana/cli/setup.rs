use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "arcana",
    bin_name = "arcana",
    version,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Tarot spreads, draws and readings from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Help sections, each owning the commands listed under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Reading,
    History,
    Misc,
}

impl CommandGroup {
    pub const ALL: [CommandGroup; 3] = [
        CommandGroup::Reading,
        CommandGroup::History,
        CommandGroup::Misc,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Reading => "Reading Commands:",
            CommandGroup::History => "History Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn commands(&self) -> &'static [&'static str] {
        match self {
            CommandGroup::Reading => &["draw", "session", "spreads", "deck"],
            CommandGroup::History => &["history", "show", "interpret", "clear"],
            CommandGroup::Misc => &["config", "doctor", "help"],
        }
    }
}

impl Commands {
    /// Canonical subcommand name, as clap knows it.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Reading(ReadingCommands::Draw { .. }) => "draw",
            Commands::Reading(ReadingCommands::Session { .. }) => "session",
            Commands::Reading(ReadingCommands::Spreads) => "spreads",
            Commands::Reading(ReadingCommands::Deck { .. }) => "deck",
            Commands::History(HistoryCommands::History) => "history",
            Commands::History(HistoryCommands::Show { .. }) => "show",
            Commands::History(HistoryCommands::Interpret { .. }) => "interpret",
            Commands::History(HistoryCommands::Clear { .. }) => "clear",
            Commands::Misc(MiscCommands::Config { .. }) => "config",
            Commands::Misc(MiscCommands::Doctor) => "doctor",
            Commands::Misc(MiscCommands::Help { .. }) => "help",
        }
    }
}

/// Top-level help with subcommands listed per group. Descriptions and the
/// options block come from the clap definitions.
pub fn grouped_help() -> String {
    let cmd = Cli::command();
    let mut out = format!(
        "arcana {}\n{}\n\nUsage: arcana [OPTIONS] [COMMAND]\n",
        cmd.get_version().unwrap_or("unknown"),
        cmd.get_about().map(|a| a.to_string()).unwrap_or_default()
    );

    for group in CommandGroup::ALL {
        out.push_str(&format!("\n{}\n", group.heading()));
        for name in group.commands() {
            let about = cmd
                .find_subcommand(name)
                .and_then(|sc| sc.get_about())
                .map(|a| a.to_string())
                .unwrap_or_default();
            out.push_str(&format!("  {:<12} {}\n", name, about));
        }
    }

    out.push_str("\nOptions:\n");
    for arg in cmd.get_arguments() {
        let (Some(short), Some(long)) = (arg.get_short(), arg.get_long()) else {
            continue;
        };
        let about = arg.get_help().map(|h| h.to_string()).unwrap_or_default();
        out.push_str(&format!("  -{}, --{:<10} {}\n", short, long, about));
    }
    out.push_str(&format!("  -V, --{:<10} Print version\n", "version"));
    out
}

pub fn print_grouped_help() {
    print!("{}", grouped_help());
}

/// Prints clap's help for `name` (aliases accepted), or the grouped help
/// when there is no such command.
pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();
    match cmd.find_subcommand_mut(name) {
        Some(sub) => print!("{}", sub.render_help()),
        None => {
            eprintln!("Unknown command: {}\n", name);
            print_grouped_help();
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Reading(ReadingCommands),

    #[command(flatten)]
    History(HistoryCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum ReadingCommands {
    /// Draw a spread in one go
    #[command(alias = "d", display_order = 1)]
    Draw {
        /// Spread key (see `arcana spreads`)
        spread: String,

        /// Number of cards for the custom spread
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u16).range(1..))]
        count: Option<u16>,

        /// Stop after this many cards
        #[arg(long, value_name = "K", value_parser = clap::value_parser!(u16).range(1..))]
        stop_after: Option<u16>,

        /// Save the reading to history
        #[arg(short, long)]
        save: bool,

        /// Note stored with the saved reading (implies --save)
        #[arg(long, value_name = "TEXT")]
        note: Option<String>,

        /// Question to ask about the reading
        #[arg(short, long, value_name = "TEXT")]
        question: Option<String>,

        /// Ask the configured model for an interpretation
        #[arg(short, long)]
        interpret: bool,
    },

    /// Start an interactive draw session
    #[command(alias = "s", display_order = 2)]
    Session {
        /// Spread key (see `arcana spreads`)
        spread: String,

        /// Number of cards for the custom spread
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u16).range(1..))]
        count: Option<u16>,
    },

    /// List the available spreads
    #[command(display_order = 3)]
    Spreads,

    /// List the cards in the deck
    #[command(display_order = 4)]
    Deck {
        /// Only show cards whose name contains this text
        query: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List saved readings (newest first)
    #[command(alias = "ls", display_order = 10)]
    History,

    /// Show one saved reading
    #[command(alias = "v", display_order = 11)]
    Show {
        /// Index from `arcana history` (1 is the newest)
        index: usize,
    },

    /// Interpret a saved reading
    #[command(display_order = 12)]
    Interpret {
        /// Index from `arcana history` (1 is the newest)
        index: usize,

        /// Question to ask about the reading
        #[arg(short, long, value_name = "TEXT")]
        question: Option<String>,
    },

    /// Delete all saved readings
    #[command(display_order = 13)]
    Clear {
        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Get or set configuration
    #[command(display_order = 30)]
    Config {
        /// Configuration key (e.g., language)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Check the data directory and the interpretation backend
    #[command(display_order = 31)]
    Doctor,

    /// Print help for arcana or a subcommand
    #[command(display_order = 32)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}
