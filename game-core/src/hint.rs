use rand::Rng;

/// Shuffles drawn in total, the first included, before a hint identical to
/// the answer is accepted
pub const MAX_HINT_SHUFFLES: usize = 100;

/// Scramble `answer` into a hint that differs from it whenever possible.
pub fn create_hint(answer: &str) -> String {
    create_hint_with(&mut rand::thread_rng(), answer)
}

pub fn create_hint_with<R: Rng + ?Sized>(rng: &mut R, answer: &str) -> String {
    let mut hint = shuffle(rng, answer);
    for _ in 1..MAX_HINT_SHUFFLES {
        if hint != answer {
            break;
        }
        hint = shuffle(rng, answer);
    }
    hint
}

fn shuffle<R: Rng + ?Sized>(rng: &mut R, word: &str) -> String {
    let mut keyed: Vec<(f64, char)> = word
        .chars()
        .map(|letter| (rng.gen_range(0.0..1.0), letter))
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, letter)| letter).collect()
}

/// True if `a` and `b` contain exactly the same characters
pub fn is_anagram(a: &str, b: &str) -> bool {
    let mut a: Vec<char> = a.chars().collect();
    let mut b: Vec<char> = b.chars().collect();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}
