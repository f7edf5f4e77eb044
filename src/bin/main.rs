use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{bail, Context};
use clap::Parser;
use lexicon_avl::{import, TranslationIndex};
use tracing_subscriber::EnvFilter;

/// Translate an English sentence word by word with an AVL-backed dictionary
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the tab-separated dictionary file (prompted for when absent)
    #[arg(env = "LEXICON_DICTIONARY")]
    dictionary: Option<PathBuf>,

    /// Print the level-order dump of the dictionary tree after loading
    #[arg(long)]
    dump: bool,

    /// Write the dictionary tree as a Graphviz digraph to this file
    #[arg(long, value_name = "FILE")]
    dot: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive("lexicon_avl=info".parse()?)
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let index = match args.dictionary {
        Some(path) => import::load_path(&path)
            .with_context(|| format!("failed to load dictionary {}", path.display()))?,
        None => prompt_dictionary(&mut input)?,
    };

    if args.dump {
        print!("{}", index.level_dump());
    }

    if let Some(path) = &args.dot {
        let mut graph = String::new();
        index.dotgraph("dictionary", &mut graph)?;
        fs::write(path, graph).with_context(|| format!("failed to write {}", path.display()))?;
    }

    if index.is_balanced() {
        println!("The dictionary tree is balanced.");
    } else {
        println!("The dictionary tree is not balanced.");
    }

    print!("Enter a sentence in English: ");
    io::stdout().flush()?;

    let Some(sentence) = read_line(&mut input)? else {
        return Ok(());
    };

    let mut translated = Vec::new();

    for token in sentence.split_whitespace() {
        if let Some(word) = resolve(&index, token, &mut input)? {
            translated.push(pick_translation(&index, &word, &mut input)?);
        }
    }

    println!("Translation: {}", translated.join(" "));

    Ok(())
}

// Asks for a dictionary path until one loads.
fn prompt_dictionary(input: &mut impl BufRead) -> anyhow::Result<TranslationIndex> {
    loop {
        print!("Dictionary file: ");
        io::stdout().flush()?;

        let Some(path) = read_line(input)? else {
            bail!("no dictionary given");
        };

        match import::load_path(path.trim()) {
            Ok(index) => return Ok(index),
            Err(e) => println!("Cannot read {}: {e}", path.trim()),
        }
    }
}

// Maps `token` to a stored word, asking the user to pick among suggestions when it is unknown.
fn resolve(
    index: &TranslationIndex,
    token: &str,
    input: &mut impl BufRead,
) -> anyhow::Result<Option<String>> {
    if index.contains(token) {
        return Ok(Some(token.to_owned()));
    }

    let suggestions = index.suggest(token);

    if suggestions.is_empty() {
        println!("No similar word found for \"{token}\", skipping it.");
        return Ok(None);
    }

    println!("\"{token}\" is not in the dictionary. Did you mean:");
    let choice = choose(&suggestions, input)?;

    Ok(Some(suggestions[choice].clone()))
}

fn pick_translation(
    index: &TranslationIndex,
    word: &str,
    input: &mut impl BufRead,
) -> anyhow::Result<String> {
    let translations = index.translate(word)?;

    if let [only] = translations {
        return Ok(only.clone());
    }

    println!("\"{word}\" has several translations:");
    let choice = choose(translations, input)?;

    Ok(translations[choice].clone())
}

// Lists `options` numbered from 1 and returns the index of the one picked. Invalid answers are
// asked again.
fn choose(options: &[String], input: &mut impl BufRead) -> anyhow::Result<usize> {
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }

    loop {
        print!("Your choice [1-{}]: ", options.len());
        io::stdout().flush()?;

        let Some(answer) = read_line(input)? else {
            bail!("input closed while waiting for a choice");
        };

        match answer.trim().parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
            _ => println!("Please enter a number between 1 and {}.", options.len()),
        }
    }
}

// Reads one line, without its line ending. Returns `None` at end of input.
fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();

    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(len);

    Ok(Some(line))
}
