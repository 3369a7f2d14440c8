//! Shape Labeler Example
//!
//! This example demonstrates how to build a command-line tool
//! using xlsxform for inspecting and labeling the shapes of a drawing part
//! (`xl/drawings/drawingN.xml` extracted from an XLSX package).

use std::fs;
use std::io::{self, Write};
use std::process;
use xlsxform::{DrawingOptions, ShapeSelector, ShapeSheet, XformError};

/// 図形に対する操作
#[derive(Debug, Clone, PartialEq)]
enum Action {
    List,
    SetId(String),
    SetVisible(bool),
    Hide,
    Show,
}

/// コマンドライン引数の解析結果
#[derive(Debug, Clone, PartialEq)]
struct Options {
    input_path: String,
    selector: ShapeSelector,
    actions: Vec<Action>,
    output_path: Option<String>,
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <drawing.xml> [options]", program);
    eprintln!("\nOptions:");
    eprintln!("  --list               Print a summary table of all shapes (default)");
    eprintln!("  --index <n>          Select shape by index (0-based, default: 0)");
    eprintln!("  --id <id>            Select shape by assigned id");
    eprintln!("  --set-id <id>        Assign an id to the selected shape");
    eprintln!("  --visible <bool>     Set visibility of the selected shape (true|false)");
    eprintln!("  --hide               Hide the selected shape");
    eprintln!("  --show               Show the selected shape");
    eprintln!("  --output <path>      Write the modified drawing ('-' for stdout)");
    eprintln!("\nExamples:");
    eprintln!("  {} drawing1.xml --list", program);
    eprintln!("  {} drawing1.xml --index 0 --set-id arrow --output out.xml", program);
    eprintln!("  {} drawing1.xml --id arrow --hide --output -", program);
    eprintln!("  {} drawing1.xml --visible false --output out.xml", program);
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        process::exit(1);
    }

    let options = parse_args(&args[1..]).unwrap_or_else(|message| {
        eprintln!("Error: {}", message);
        process::exit(1);
    });

    match run(&options) {
        Ok(_) => {
            if let Some(path) = options.output_path.as_deref().filter(|p| *p != "-") {
                println!("Drawing written: {} -> {}", options.input_path, path);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// 引数（プログラム名を除く）を解析する
///
/// 図形の指定がない場合は先頭の図形（インデックス0）を対象にします。
fn parse_args(args: &[String]) -> Result<Options, String> {
    let input_path = args
        .first()
        .ok_or_else(|| "missing input path".to_string())?
        .clone();

    let mut options = Options {
        input_path,
        selector: ShapeSelector::Index(0),
        actions: Vec::new(),
        output_path: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--list" => {
                options.actions.push(Action::List);
                i += 1;
            }
            "--index" => {
                let value = require_value(args, i)?;
                let index = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid shape index: {}", value))?;
                options.selector = ShapeSelector::Index(index);
                i += 2;
            }
            "--id" => {
                options.selector = ShapeSelector::Id(require_value(args, i)?.to_string());
                i += 2;
            }
            "--set-id" => {
                let id = require_value(args, i)?.to_string();
                options.actions.push(Action::SetId(id));
                i += 2;
            }
            "--visible" => {
                let visible = require_value(args, i)? == "true";
                options.actions.push(Action::SetVisible(visible));
                i += 2;
            }
            "--hide" => {
                options.actions.push(Action::Hide);
                i += 1;
            }
            "--show" => {
                options.actions.push(Action::Show);
                i += 1;
            }
            "--output" => {
                options.output_path = Some(require_value(args, i)?.to_string());
                i += 2;
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
    }

    if options.actions.is_empty() {
        options.actions.push(Action::List);
    }
    Ok(options)
}

/// オプションの値を取得
fn require_value(args: &[String], i: usize) -> Result<&str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{} requires a value", args[i]))
}

/// 操作を順に適用する（一覧表示は標準出力へ）
fn apply(
    sheet: &mut ShapeSheet,
    selector: &ShapeSelector,
    actions: &[Action],
) -> Result<(), XformError> {
    for action in actions {
        match action {
            Action::List => print!("{}", sheet.summary_table()),
            Action::SetId(id) => sheet.assign_id(selector.clone(), id)?,
            Action::SetVisible(visible) => sheet.set_visible(selector.clone(), *visible)?,
            Action::Hide => sheet.hide(selector.clone())?,
            Action::Show => sheet.show(selector.clone())?,
        }
    }
    Ok(())
}

fn run(options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let xml = fs::read_to_string(&options.input_path)?;
    let mut sheet = ShapeSheet::from_drawing_xml(&xml, DrawingOptions::default())?;

    apply(&mut sheet, &options.selector, &options.actions)?;

    match options.output_path.as_deref() {
        Some("-") => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(sheet.to_drawing_xml()?.as_bytes())?;
            handle.flush()?;
        }
        Some(path) => fs::write(path, sheet.to_drawing_xml()?)?,
        None => {}
    }

    Ok(())
}
