//! 一个增量式预测分析的简单实现, 使用 LL(1) 文法.
//!
//! 使用给定的 CFG 文法 (固定不变), 对一段 tokens 做语法分析, 增量地构建语法树,
//! 并演示单个错误 token 的跳过式恢复.
//! 参考龙书中文第二版 P145
//! ```text
//! 设 ip 指向 w$ 的第一个符号;
//! 令 X 为栈顶符号;
//! while (X != $) { /* 栈非空 */
//!     if (X 等于 ip 所指符号 a) { 弹出栈顶, ip 前移; }
//!     else if (X 是终结符) error();
//!     else if (M[X, a] 是报错条目) error();
//!     else if (M[X, a] = X -> Y1 Y2 ... Yk) {
//!         输出产生式 X -> Y1 Y2 ... Yk;
//!         弹出栈顶, 按 Yk, ..., Y1 的顺序压入;
//!     }
//!     令 X 为栈顶符号;
//! }
//! ```
use ll_analysis::{Attributes, Grammar, Loc, Parser, Table, Terminal};
use tracing::{error, info};

/// 把一行源代码按空白切开, 同时给出每个 token 的列偏移.
fn tokens_of(line: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut rest = line;
    let mut base = 0usize;
    std::iter::from_fn(move || {
        let trimmed = rest.trim_start();
        base += rest.len() - trimmed.len();
        if trimmed.is_empty() {
            return None;
        }
        let end = trimmed
            .find(char::is_whitespace)
            .unwrap_or(trimmed.len());
        let col = base;
        let tok = &trimmed[..end];
        rest = &trimmed[end..];
        base += end;
        Some((col, tok))
    })
}

fn main() {
    #[cfg(debug_assertions)]
    {
        use tracing::level_filters::LevelFilter;
        use tracing_subscriber::{
            Layer, fmt, layer::SubscriberExt, registry, util::SubscriberInitExt,
        };

        let layer = fmt::layer()
            .without_time()
            .with_writer(std::io::stderr)
            .with_filter(LevelFilter::DEBUG);
        registry().with(layer).init();
    }

    let bump = bumpalo::Bump::new();
    // 一个已经是右递归且无公共左因子的小语言文法, 天然 LL(1).
    let grammar = Grammar::from_cfg(
        r#"program -> compoundstmt
stmt -> ifstmt | whilestmt | assgstmt | compoundstmt
compoundstmt -> { stmts }
stmts -> stmt stmts | E
ifstmt -> if ( boolexpr ) then stmt else stmt
whilestmt -> while ( boolexpr ) stmt
assgstmt -> ID = arithexpr ;
boolexpr -> arithexpr boolop arithexpr
boolop -> < | > | <= | >= | ==
arithexpr -> multexpr arithexprprime
arithexprprime -> + multexpr arithexprprime | - multexpr arithexprprime | E
multexpr -> simpleexpr multexprprime
multexprprime -> * simpleexpr multexprprime | / simpleexpr multexprprime | E
simpleexpr -> ID | NUM | ( arithexpr )
"#,
        "program".into(),
        &bump,
    )
    .unwrap();
    // 计算属性集, 建预测分析表.
    let attrs = Attributes::of(&grammar);
    let table = Table::build_from(&grammar, &attrs).unwrap();

    // 输入程序, 第二个赋值语句多打了一个 `=`.
    let input = r#"{
ID = NUM ;
ID = = NUM ;
}"#;
    let terms = input.lines().enumerate().flat_map(|(ln, line)| {
        tokens_of(line)
            .map(move |(col, part)| Terminal::from(part).at(Loc::new(ln + 1, col + 1)))
    });

    let mut parser = Parser::new(&table);
    for term in terms {
        info!("feed: {term} at {:?}", term.loc());
        // 可恢复错误: 记录之后继续喂入, 出错的 token 相当于被跳过.
        if let Err(e) = parser.feed(term) {
            error!("{e}");
            println!(
                "语法错误，第{}行，非预期的\"{}\"",
                term.loc().map_or(0, |l| l.line),
                term
            );
        }
    }
    let tree = parser.input_complete().unwrap();
    println!("{tree}");
    println!("{}", tree.to_xml());
}
