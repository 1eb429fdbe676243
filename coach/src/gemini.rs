//! Providers backed by the Gemini API.

use async_trait::async_trait;
use kata_gemini::Client;
use serde_json::{Value, json};

use crate::error::{CoachError, Result};
use crate::provider::{ChallengeProvider, HintProvider, JudgeProvider, VoiceSynthesisProvider};
use crate::types::{Challenge, Difficulty, Evaluation, Language};

const CHALLENGE_SYSTEM: &str = "You are an interviewer who writes algorithm practice problems. \
Write one self-contained problem with a clear statement, two or three worked examples and \
explicit constraints. Provide starter code with an empty function body for every language \
listed in the schema.";

const JUDGE_SYSTEM: &str = "You are a strict but encouraging code reviewer. Decide whether the \
submission solves the problem for all inputs allowed by the constraints, including edge cases. \
Do not execute anything; reason about the code. Give the time and space complexity in big-O \
notation. The voiceScript is read aloud: two short sentences, no code, no markdown.";

const HINT_SYSTEM: &str = "You are a patient coding mentor. Answer the question about the \
user's current code with a nudge in the right direction. Never write the full solution. \
Keep the answer under 120 words.";

/// Challenge, judge, hint and voice provider over a single Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiCoach {
    client: Client,
    difficulty: Option<Difficulty>,
    topic: Option<String>,
}

impl GeminiCoach {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            difficulty: None,
            topic: None,
        }
    }

    /// Requests challenges of the given difficulty.
    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Requests challenges about the given topic (e.g. "graphs").
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        let topic = topic.into();
        self.topic = (!topic.trim().is_empty()).then_some(topic);
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn challenge_prompt(&self) -> String {
        let mut prompt = String::from("Create a new coding challenge.");
        if let Some(d) = self.difficulty {
            prompt.push_str(&format!(" Difficulty: {}.", d));
        }
        if let Some(topic) = &self.topic {
            prompt.push_str(&format!(" Topic: {}.", topic));
        }
        prompt
    }
}

#[async_trait]
impl ChallengeProvider for GeminiCoach {
    async fn generate_challenge(&self) -> Result<Challenge> {
        let challenge: Challenge = self
            .client
            .generate_json(CHALLENGE_SYSTEM, &self.challenge_prompt(), challenge_schema())
            .await?;
        if challenge.title.trim().is_empty() || challenge.description.trim().is_empty() {
            return Err(CoachError::Provider(
                "challenge is missing a title or description".to_string(),
            ));
        }
        tracing::debug!(
            title = %challenge.title,
            difficulty = %challenge.difficulty,
            "challenge generated"
        );
        Ok(challenge)
    }
}

#[async_trait]
impl JudgeProvider for GeminiCoach {
    async fn evaluate(
        &self,
        challenge: &Challenge,
        code: &str,
        language: Language,
    ) -> Result<Evaluation> {
        let prompt = judge_prompt(challenge, code, language);
        let evaluation: Evaluation = self
            .client
            .generate_json(JUDGE_SYSTEM, &prompt, evaluation_schema())
            .await?;
        tracing::debug!(passed = evaluation.passed, score = evaluation.score, "submission judged");
        Ok(evaluation)
    }
}

#[async_trait]
impl HintProvider for GeminiCoach {
    async fn hint(&self, challenge: &Challenge, code: &str, question: &str) -> Result<String> {
        let prompt = hint_prompt(challenge, code, question);
        let answer = self.client.generate_text(HINT_SYSTEM, &prompt).await?;
        Ok(answer.trim().to_string())
    }
}

#[async_trait]
impl VoiceSynthesisProvider for GeminiCoach {
    async fn synthesize(&self, script: &str) -> Result<String> {
        Ok(self.client.synthesize_speech(script).await?)
    }
}

fn describe_challenge(challenge: &Challenge) -> String {
    let mut out = format!(
        "Problem: {} ({})\n\n{}\n",
        challenge.title, challenge.difficulty, challenge.description
    );
    for (i, ex) in challenge.examples.iter().enumerate() {
        out.push_str(&format!(
            "\nExample {}:\nInput: {}\nOutput: {}\n",
            i + 1,
            ex.input,
            ex.output
        ));
        if let Some(explanation) = &ex.explanation {
            out.push_str(&format!("Explanation: {}\n", explanation));
        }
    }
    if !challenge.constraints.is_empty() {
        out.push_str("\nConstraints:\n");
        for c in &challenge.constraints {
            out.push_str(&format!("- {}\n", c));
        }
    }
    out
}

pub(crate) fn judge_prompt(challenge: &Challenge, code: &str, language: Language) -> String {
    format!(
        "{}\nSubmission ({}):\n```{}\n{}\n```\n",
        describe_challenge(challenge),
        language,
        language,
        code
    )
}

pub(crate) fn hint_prompt(challenge: &Challenge, code: &str, question: &str) -> String {
    let code = if code.trim().is_empty() {
        "(no code yet)"
    } else {
        code
    };
    format!(
        "{}\nCurrent code:\n```\n{}\n```\n\nQuestion: {}\n",
        describe_challenge(challenge),
        code,
        question
    )
}

/// Response schema for [`Challenge`], in the Gemini OpenAPI subset.
pub fn challenge_schema() -> Value {
    let starter: serde_json::Map<String, Value> = Language::ALL
        .iter()
        .map(|l| (l.as_str().to_string(), json!({"type": "STRING"})))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "title": {"type": "STRING"},
            "difficulty": {"type": "STRING", "enum": ["Easy", "Medium", "Hard"]},
            "description": {"type": "STRING"},
            "examples": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "input": {"type": "STRING"},
                        "output": {"type": "STRING"},
                        "explanation": {"type": "STRING"}
                    },
                    "required": ["input", "output"]
                }
            },
            "constraints": {"type": "ARRAY", "items": {"type": "STRING"}},
            "starterCode": {"type": "OBJECT", "properties": starter}
        },
        "required": ["title", "difficulty", "description", "examples", "constraints", "starterCode"]
    })
}

/// Response schema for [`Evaluation`], in the Gemini OpenAPI subset.
pub fn evaluation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "passed": {"type": "BOOLEAN"},
            "score": {"type": "INTEGER", "minimum": 0, "maximum": 100},
            "feedback": {"type": "STRING"},
            "timeComplexity": {"type": "STRING"},
            "spaceComplexity": {"type": "STRING"},
            "voiceScript": {"type": "STRING"}
        },
        "required": ["passed", "score", "feedback", "timeComplexity", "spaceComplexity", "voiceScript"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Example;

    fn challenge() -> Challenge {
        Challenge {
            title: "Two Sum".into(),
            difficulty: Difficulty::Easy,
            description: "Return indices of two numbers adding to target.".into(),
            examples: vec![Example {
                input: "nums = [2,7,11,15], target = 9".into(),
                output: "[0,1]".into(),
                explanation: Some("2 + 7 = 9".into()),
            }],
            constraints: vec!["2 <= nums.length <= 10^4".into()],
            starter_code: Default::default(),
        }
    }

    #[test]
    fn test_judge_prompt_contains_everything() {
        let prompt = judge_prompt(&challenge(), "def f(): pass", Language::Python);
        assert!(prompt.contains("Two Sum (Easy)"));
        assert!(prompt.contains("Explanation: 2 + 7 = 9"));
        assert!(prompt.contains("- 2 <= nums.length"));
        assert!(prompt.contains("```python\ndef f(): pass\n```"));
    }

    #[test]
    fn test_hint_prompt_without_code() {
        let prompt = hint_prompt(&challenge(), "  ", "Where do I start?");
        assert!(prompt.contains("(no code yet)"));
        assert!(prompt.ends_with("Question: Where do I start?\n"));
    }

    #[test]
    fn test_schemas_match_wire_names() {
        let schema = challenge_schema();
        let starter = &schema["properties"]["starterCode"]["properties"];
        for lang in Language::ALL {
            assert!(starter.get(lang.as_str()).is_some());
        }

        let eval = evaluation_schema();
        let required: Vec<&str> = eval["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(required.contains(&"voiceScript"));
        assert!(required.contains(&"timeComplexity"));
    }

    #[test]
    fn test_challenge_prompt_options() {
        let client = Client::new("key").unwrap();
        let coach = GeminiCoach::new(client.clone());
        assert_eq!(coach.challenge_prompt(), "Create a new coding challenge.");

        let coach = GeminiCoach::new(client)
            .difficulty(Difficulty::Hard)
            .topic("graphs");
        assert_eq!(
            coach.challenge_prompt(),
            "Create a new coding challenge. Difficulty: Hard. Topic: graphs."
        );
    }
}
