use std::io::{self, Read};

use bumpalo::Bump;
use clap::Parser;
use ll_analysis::*;

#[derive(clap::Parser)]
struct AppArgs {
    #[clap(short, long)]
    symbol_start: String,
    /// 建表之前先消除左递归.
    #[clap(long)]
    remove_left_recursion: bool,
    /// 建表之前提取左公因子 (在消除左递归之后执行).
    #[clap(long)]
    left_factor: bool,
}

fn main() {
    let args = AppArgs::parse();
    let mut inp = String::new();
    io::stdin().read_to_string(&mut inp).unwrap();
    let bump = Bump::new();
    let mut grammar =
        Grammar::from_cfg(&inp, args.symbol_start.as_str().into(), &bump).unwrap();
    if args.remove_left_recursion {
        grammar = grammar.without_left_recursion().unwrap();
    }
    if args.left_factor {
        grammar = grammar.left_factored().unwrap();
    }
    for prod in grammar.prods() {
        println!("{:>4} {}", prod.id(), prod);
    }
    println!();
    let attrs = Attributes::of(&grammar);
    println!("{attrs}");
    println!("--- Table ---");
    match Table::build_from(&grammar, &attrs) {
        Ok(table) => println!("{}", table.to_markdown()),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
