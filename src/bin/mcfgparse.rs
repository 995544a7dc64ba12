//! A minimal CLI smoke-test harness over the parser's public API: picks one
//! of the bundled fixture grammars and parses a sentence against it,
//! printing accept/reject and a one-line-per-item trace dump.

use argh::FromArgs;
use mcfgparse::fixtures::all_fixtures;

#[derive(FromArgs)]
/// Parse a sentence against one of the bundled MCFG fixture grammars.
struct Args {
    /// fixture grammar name (see --list)
    #[argh(option, short = 'g')]
    grammar: Option<String>,

    /// sentence to parse, space-separated tokens
    #[argh(option, short = 'i')]
    input: Option<String>,

    /// list the bundled fixture grammars and exit
    #[argh(switch, short = 'l')]
    list: bool,
}

fn main() {
    env_logger::init();
    let args: Args = argh::from_env();
    let fixtures = all_fixtures();

    if args.list {
        for fixture in &fixtures {
            println!("{}", fixture.name);
        }
        return;
    }

    let grammar_name = match &args.grammar {
        Some(name) => name.as_str(),
        None => {
            eprintln!("error: --grammar is required (pass --list to see options)");
            std::process::exit(2);
        }
    };
    let input = match &args.input {
        Some(input) => input.as_str(),
        None => {
            eprintln!("error: --input is required");
            std::process::exit(2);
        }
    };

    let Some(fixture) = fixtures.iter().find(|f| f.name == grammar_name) else {
        eprintln!("error: unknown grammar '{grammar_name}' (pass --list to see options)");
        std::process::exit(2);
    };

    match mcfgparse::parse(&fixture.grammar, input) {
        Ok(Some(trace)) => {
            println!("accept");
            print!("{trace}");
        }
        Ok(None) => {
            println!("reject");
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
