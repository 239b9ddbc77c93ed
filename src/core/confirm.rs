//! Confirmation of destructive actions (deleting a history entry).

/// Asks the user a yes/no question. Returns true only on an explicit yes.
pub type Confirm = Box<dyn Fn(&str) -> bool>;

/// Default implementation: prompt on stderr, read y/N from stdin.
pub fn default_confirm() -> Confirm {
    Box::new(|question: &str| {
        eprint!("{} [y/N] ", question);
        let _ = std::io::Write::flush(&mut std::io::stderr());
        let mut s = String::new();
        if std::io::stdin().read_line(&mut s).is_err() {
            return false;
        }
        is_yes(&s)
    })
}

fn is_yes(answer: &str) -> bool {
    let t = answer.trim();
    t.eq_ignore_ascii_case("y") || t.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::is_yes;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }
}
