use clap::Parser;
use std::fmt::{Debug, Formatter};
use xword_layout::grid::DisplayGlyphs;
use xword_layout::layout_search::{find_layouts, improving_layouts};
use xword_layout::word_list::{WordList, WordListSourceConfig};

/// xword_layout: Command-line tool for building freeform crossword layouts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the word list, one word per line; the first word (after shuffling) anchors every
    /// layout
    word_list_path: String,

    /// Seed for shuffling the word list [default: random]
    #[arg(long)]
    seed: Option<u64>,

    /// Keep the word list in file order instead of shuffling it
    #[arg(long)]
    no_shuffle: bool,

    /// Maximum word length to load [default: none]
    #[arg(long)]
    max_length: Option<usize>,

    /// Stop after this many improving layouts have been printed [default: none]
    #[arg(long)]
    max_solutions: Option<usize>,

    /// Character used to draw empty cells [default: depends on the word list's alphabet]
    #[arg(long)]
    empty: Option<char>,

    /// Character used to draw word boundaries [default: depends on the word list's alphabet]
    #[arg(long)]
    filled: Option<char>,
}

struct Error(String);

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0) // Print error unquoted
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let args = Args::parse();

    let mut word_list = WordList::new(
        &[WordListSourceConfig::File {
            id: "0".into(),
            path: args.word_list_path.clone().into(),
        }],
        args.max_length,
    );

    #[allow(clippy::comparison_chain)]
    if let Some(errors) = word_list.get_source_errors().get("0") {
        if errors.len() == 1 {
            return Err(Error(format!("{}", errors[0])));
        } else if errors.len() > 1 {
            let mut full_error: String = "".into();
            for error in errors {
                full_error.push_str(&format!("\n- {error}"));
            }
            return Err(Error(full_error));
        }
    }

    if word_list.is_empty() {
        return Err(Error("Word list is empty".into()));
    }

    if !args.no_shuffle {
        let seed = args.seed.unwrap_or_else(rand::random);
        log::info!("Shuffling word list with seed {seed}");
        word_list.shuffle(seed);
    }

    let detected_glyphs = DisplayGlyphs::for_words(&word_list.words);
    let glyphs = DisplayGlyphs {
        empty: args.empty.unwrap_or(detected_glyphs.empty),
        filled: args.filled.unwrap_or(detected_glyphs.filled),
    };

    let search = find_layouts(&word_list.words).map_err(|err| Error(format!("{err}")))?;

    for (score, crossword) in improving_layouts(search).take(args.max_solutions.unwrap_or(usize::MAX))
    {
        println!("{}", crossword.render(glyphs));
        println!("score: {score:.6}");
        println!();
    }

    Ok(())
}
