// ============================================================
// Layer 4 — bAbI Text Preprocessor
// ============================================================
// Turns the raw lines of a bAbI task file into QaExamples.
//
// File format (one statement per line, ids restart at 1 for
// every new story):
//
//   1 Mary moved to the bathroom.
//   2 John went to the hallway.
//   3 Where is Mary? \tbathroom\t1
//   4 Daniel went back to the hallway.
//   5 Where is Daniel? \thallway\t4
//
// A line containing tabs is a question:
//   question \t answer \t supporting-fact ids
// Question lines take up an id but are not part of the story
// that later questions see.
//
// Cleaning steps per line:
//   1. Lowercase
//   2. Split into word runs and punctuation runs
//   3. Drop the trailing "." of sentences / "?" of questions

use std::sync::LazyLock;

use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;

use crate::domain::example::QaExample;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());

/// Split a sentence into word and punctuation tokens.
///
/// "mary moved to the bathroom." → [mary, moved, to, the, bathroom, .]
/// Case is left alone; the parser lowercases whole lines first.
pub fn tokenize(sentence: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut push = |piece: &str| {
        let piece = piece.trim();
        if !piece.is_empty() {
            tokens.push(piece.to_string());
        }
    };

    let mut last = 0;
    for m in NON_WORD.find_iter(sentence) {
        push(&sentence[last..m.start()]);
        push(m.as_str());
        last = m.end();
    }
    push(&sentence[last..]);

    tokens
}

/// Parses the lines of one task file.
pub struct StoryParser {
    /// Keep only the supporting facts of each question as its story
    only_supporting: bool,
}

impl StoryParser {
    pub fn new(only_supporting: bool) -> Self {
        Self { only_supporting }
    }

    /// Parse a whole task file into examples, in file order.
    pub fn parse(&self, text: &str) -> Result<Vec<QaExample>> {
        let mut examples = Vec::new();
        // Indexed by (line id - 1); question lines hold an empty placeholder
        let mut story: Vec<Vec<String>> = Vec::new();

        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim().to_lowercase();
            if line.is_empty() {
                continue;
            }

            let (nid, rest) = line
                .split_once(' ')
                .ok_or_else(|| anyhow!("line {}: missing text after id", line_no + 1))?;
            let nid: usize = nid
                .parse()
                .with_context(|| format!("line {}: invalid line id '{}'", line_no + 1, nid))?;

            if nid == 1 {
                story.clear();
            }

            if rest.contains('\t') {
                let example = self
                    .parse_question(rest, &story)
                    .with_context(|| format!("line {}: malformed question", line_no + 1))?;
                examples.push(example);
                story.push(Vec::new());
            } else {
                let mut sentence = tokenize(rest);
                if sentence.last().map(String::as_str) == Some(".") {
                    sentence.pop();
                }
                story.push(sentence);
            }
        }

        Ok(examples)
    }

    fn parse_question(&self, rest: &str, story: &[Vec<String>]) -> Result<QaExample> {
        let mut fields = rest.split('\t');
        let question = fields.next().unwrap_or_default();
        let answer = fields
            .next()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| anyhow!("question without an answer"))?;
        let supporting = fields.next().unwrap_or_default();

        let mut query = tokenize(question);
        if query.last().map(String::as_str) == Some("?") {
            query.pop();
        }

        let substory = if self.only_supporting {
            supporting
                .split_whitespace()
                .map(|id| {
                    let id: usize = id
                        .parse()
                        .with_context(|| format!("invalid supporting fact id '{id}'"))?;
                    match id.checked_sub(1).and_then(|i| story.get(i)) {
                        Some(sentence) => Ok(sentence.clone()),
                        None => bail!("supporting fact {id} is outside the story"),
                    }
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            story.iter().filter(|s| !s.is_empty()).cloned().collect()
        };

        Ok(QaExample::new(substory, query, answer))
    }
}

impl Default for StoryParser {
    fn default() -> Self {
        Self::new(false)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const TASK: &str = "\
1 Mary moved to the bathroom.
2 John went to the hallway.
3 Where is Mary? \tbathroom\t1
4 Daniel went back to the hallway.
5 Where is Daniel? \thallway\t4
1 Sandra travelled to the office.
2 Where is Sandra? \toffice\t1
";

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_tokenize_splits_punctuation() {
        assert_eq!(
            tokenize("mary moved to the bathroom."),
            words("mary moved to the bathroom .")
        );
        assert_eq!(tokenize("where is mary? "), words("where is mary ?"));
    }

    #[test]
    fn test_tokenize_keeps_inner_punctuation() {
        assert_eq!(tokenize("north, then west"), words("north , then west"));
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_parse_builds_substories() {
        let examples = StoryParser::default().parse(TASK).unwrap();
        assert_eq!(examples.len(), 3);

        assert_eq!(examples[0].story, vec![words("mary moved to the bathroom")]);
        assert_eq!(examples[0].query, words("where is mary"));
        assert_eq!(examples[0].answer, "bathroom");

        // Question lines are not part of later stories
        assert_eq!(examples[1].story.len(), 3);
        assert_eq!(examples[1].story[2], words("daniel went back to the hallway"));
        assert_eq!(examples[1].answer, "hallway");

        // Id 1 starts a new story
        assert_eq!(examples[2].story, vec![words("sandra travelled to the office")]);
    }

    #[test]
    fn test_only_supporting_facts() {
        let examples = StoryParser::new(true).parse(TASK).unwrap();
        assert_eq!(examples[1].story, vec![words("daniel went back to the hallway")]);
    }

    #[test]
    fn test_supporting_fact_out_of_range() {
        let bad = "1 Mary moved to the bathroom.\n2 Where is Mary? \tbathroom\t7\n";
        assert!(StoryParser::new(true).parse(bad).is_err());
        // Without only_supporting the ids are never looked at
        assert!(StoryParser::new(false).parse(bad).is_ok());
    }

    #[test]
    fn test_invalid_line_id() {
        let err = StoryParser::default().parse("x Mary moved.\n").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_list_answer_is_one_token() {
        let text = "1 The kitchen is north of the hallway.\n2 How do you go from the hallway to the kitchen?\tn,w\t1\n";
        let examples = StoryParser::default().parse(text).unwrap();
        assert_eq!(examples[0].answer, "n,w");
    }
}
