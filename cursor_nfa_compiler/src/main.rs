use cursor_nfa_compiler::{Compiler, Regex};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some((pattern, inputs)) = args.split_first() {
        if !run(pattern, inputs) {
            std::process::exit(1);
        }
        return;
    }

    println!("Cursor NFA Compiler - Automaton Structure Demo");
    println!("==============================================");

    let test_patterns = vec![
        ("ab", vec!["ab", "a", "abc"]),
        ("a*", vec!["", "aaa", "ab"]),
        ("a|b", vec!["a", "b", "ab"]),
        ("[^abc]", vec!["x", "a"]),
        ("^a$", vec!["a", "ab", ""]),
        ("(?m)^b$", vec!["b", "a\nb"]),
        (r"\bcat\b", vec!["cat", "cats"]),
        ("(?:ab){2,3}", vec!["abab", "ab"]),
    ];

    for (pattern, inputs) in test_patterns {
        let inputs: Vec<String> = inputs.into_iter().map(String::from).collect();
        run(pattern, &inputs);
    }
}

/// Print the automaton for `pattern` and match each input against it.
/// Returns false if the pattern failed to compile.
fn run(pattern: &str, inputs: &[String]) -> bool {
    println!("\n=== Pattern: '{}' ===", pattern);

    let re = match Regex::with_compiler(pattern, &Compiler::new()) {
        Ok(re) => re,
        Err(e) => {
            eprintln!("Failed to compile: {}", e);
            return false;
        }
    };

    print!("{}", re.nfa());
    for input in inputs {
        println!("{:?} -> {}", input, if re.is_match(input) { "match" } else { "no match" });
    }
    true
}
