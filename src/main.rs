use calcdeck::cli;
use calcdeck::error::CalcResult;
use calcdeck::graph::DEFAULT_POINTS;
use calcdeck::loan::InterestType;
use calcdeck::rates::DEFAULT_RATES_URL;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calcdeck")]
#[command(about = "Calculator, converter, loan and graphing engines on the command line")]
#[command(long_about = "Calcdeck - multi-mode calculator

COMMANDS:
  basic     - Left-to-right keypad calculator
  sci       - Scientific calculator (functions, inverse, degrees/radians)
  convert   - Length, mass, time, area, volume and temperature units
  currency  - Currency conversion with live or supplied rates
  loan      - Monthly payment for simple or compound interest
  graph     - Sample y = f(x) over a range

EXAMPLES:
  calcdeck basic '2+3*4='                  # 20 (no precedence)
  calcdeck sci 30 sin                      # 0.5 (degrees)
  calcdeck sci inv 0.5 sin                 # 30
  calcdeck convert 1 mile kilometer
  calcdeck currency 100 usd eur --rate EUR=0.92
  calcdeck loan --principal 10000 --rate 5 --years 5
  calcdeck graph '1/x' --x-min -5 --x-max 5 --points 11")]
#[command(version)]
struct Cli {
    /// Log engine internals to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Run keystrokes through the basic calculator.

KEYS:
  0-9 .          digits and decimal point
  + - * / %      operators (x × ÷ also accepted, % is remainder)
  =              equals
  C              clear
  <              backspace

Operators apply strictly left to right: 2+3*4= gives 20.")]
    /// Basic keypad calculator
    Basic {
        /// Keystrokes, e.g. '12+7='
        keys: String,
    },

    #[command(long_about = "Run keys through the scientific calculator.

Each argument is one key:
  sin cos tan log ln sqrt fact pi e   function buttons
  inv                                 invert the next function
  deg rad                             angle mode for function buttons
  =  C  DEL                           evaluate, clear, backspace
  anything else                       literal text (digits, operators, parentheses)

Typed functions such as 'sin(' are evaluated in radians regardless of mode.")]
    /// Scientific calculator
    #[command(allow_negative_numbers = true)]
    Sci {
        /// Keys, e.g. 2 ^ 10 =
        #[arg(required = true)]
        tokens: Vec<String>,

        /// Start in radians instead of degrees
        #[arg(short, long)]
        radians: bool,
    },

    /// Convert between units of the same category
    #[command(allow_negative_numbers = true)]
    Convert {
        amount: f64,

        /// Source unit id (e.g. meter, pound, celsius, sq_foot)
        from: String,

        /// Target unit id
        to: String,
    },

    /// Convert an amount between currencies
    Currency {
        amount: f64,

        /// Source currency code
        from: String,

        /// Target currency code
        to: String,

        /// Use this rate instead of fetching (CODE=RATE, repeatable)
        #[arg(long = "rate", value_name = "CODE=RATE")]
        rates: Vec<String>,

        /// Rate service base URL
        #[arg(long, default_value = DEFAULT_RATES_URL, env = "CALCDECK_RATES_URL")]
        api_url: String,
    },

    /// Monthly payment and totals for a loan
    Loan {
        /// Loan amount
        #[arg(long)]
        principal: f64,

        /// Annual interest rate in percent
        #[arg(long)]
        rate: f64,

        /// Term in years
        #[arg(long)]
        years: f64,

        /// simple or compound
        #[arg(long = "type", default_value = "compound")]
        interest_type: InterestType,
    },

    /// Sample a function of x over a range
    #[command(allow_negative_numbers = true)]
    Graph {
        /// Expression in x, e.g. 'x^2 - 3*x'
        expression: String,

        #[arg(long, default_value = "-10")]
        x_min: f64,

        #[arg(long, default_value = "10")]
        x_max: f64,

        /// Number of grid points
        #[arg(long, default_value_t = DEFAULT_POINTS)]
        points: usize,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("calcdeck=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> CalcResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Basic { keys } => cli::basic(keys),

        Commands::Sci { tokens, radians } => cli::scientific(tokens, radians),

        Commands::Convert { amount, from, to } => cli::convert(amount, from, to),

        Commands::Currency {
            amount,
            from,
            to,
            rates,
            api_url,
        } => cli::currency(amount, from, to, rates, api_url),

        Commands::Loan {
            principal,
            rate,
            years,
            interest_type,
        } => cli::loan(principal, rate, years, interest_type),

        Commands::Graph {
            expression,
            x_min,
            x_max,
            points,
        } => cli::graph(expression, x_min, x_max, points),
    }
}
