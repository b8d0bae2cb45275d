//! # Prompting techniques
//!
//! Builders for the classic prompt-shaping techniques. Each produces a plain prompt
//! string (or a system message), so they compose with [PromptTemplate](crate::prompt::PromptTemplate)
//! and feed straight into [ChatRequest](crate::llm::ChatRequest).
//!
//! * [zero_shot] / [few_shot]: steer output format by example instead of instruction
//! * [RolePrompt]: give the model a persona and a measurable goal
//! * [step_by_step] / [chain_of_thought]: decompose a task into explicit stages
//! * [Guidance]: positive (DO) and negative (DON'T) framing blocks

use serde::{Deserialize, Serialize};

use crate::llm::ChatMessage;

/// One worked input/output pair for few-shot prompting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exemplar {
    pub input: String,
    pub output: String,
}

impl Exemplar {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// A task prompt with no examples, only the instruction and the new input.
pub fn zero_shot(task: &str, input: &str) -> String {
    format!("{task}\n\nInput: {input}\nOutput:")
}

/// A task prompt that teaches by example: the instruction, each exemplar as an
/// `Input:`/`Output:` pair, then the new input with its output left open.
pub fn few_shot(task: &str, exemplars: &[Exemplar], input: &str) -> String {
    let mut prompt = format!("{task}\n\n");
    for exemplar in exemplars {
        prompt.push_str(&format!(
            "Input: {}\nOutput: {}\n\n",
            exemplar.input, exemplar.output
        ));
    }
    prompt.push_str(&format!("Input: {input}\nOutput:"));
    prompt
}

/// A persona plus a goal plus constraints, rendered as a system-style preamble.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RolePrompt {
    role: String,
    goal: Option<String>,
    constraints: Vec<String>,
}

impl RolePrompt {
    /// `role` completes the sentence "You are ...".
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            goal: None,
            constraints: Vec::new(),
        }
    }

    /// `goal` completes the sentence "Your goal is to ...".
    pub fn goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = Some(goal.into());
        self
    }

    pub fn constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraints.push(constraint.into());
        self
    }

    pub fn build(&self) -> String {
        let mut prompt = format!("You are {}.", self.role);
        if let Some(goal) = &self.goal {
            prompt.push_str(&format!(" Your goal is to {goal}."));
        }
        if !self.constraints.is_empty() {
            prompt.push_str("\n\nConstraints:");
            for constraint in &self.constraints {
                prompt.push_str(&format!("\n- {constraint}"));
            }
        }
        prompt
    }

    pub fn to_system_message(&self) -> ChatMessage {
        ChatMessage::system(self.build())
    }
}

/// A task broken into explicit numbered steps, with a closing instruction to show the
/// work for each one.
pub fn step_by_step(task: &str, steps: &[&str]) -> String {
    let mut prompt = format!("{task}\n");
    for (index, step) in steps.iter().enumerate() {
        prompt.push_str(&format!("\nStep {}: {step}", index + 1));
    }
    prompt.push_str("\n\nShow your work for each step.");
    prompt
}

/// The minimal chain-of-thought nudge, appended when enumerating steps up front is not
/// worth it.
pub fn chain_of_thought(task: &str) -> String {
    format!("{task}\n\nLet's think step by step.")
}

/// Positive (DO) and negative (DON'T) framing for a task.
///
/// Positive items give constructive guidance, negative ones set boundaries. Too many
/// negatives confuse a model, so prefer DO items and keep DON'T for real hazards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Guidance {
    dos: Vec<String>,
    donts: Vec<String>,
}

impl Guidance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a DO item, what the model should do.
    pub fn prefer(mut self, item: impl Into<String>) -> Self {
        self.dos.push(item.into());
        self
    }

    /// Add a DON'T item, what the model must not do.
    pub fn avoid(mut self, item: impl Into<String>) -> Self {
        self.donts.push(item.into());
        self
    }

    /// Attach the framing blocks to a task prompt. Empty blocks are omitted.
    pub fn apply(&self, task: &str) -> String {
        let mut prompt = task.to_string();
        if !self.dos.is_empty() {
            prompt.push_str("\n\nDO:");
            for item in &self.dos {
                prompt.push_str(&format!("\n- {item}"));
            }
        }
        if !self.donts.is_empty() {
            prompt.push_str("\n\nDON'T:");
            for item in &self.donts {
                prompt.push_str(&format!("\n- {item}"));
            }
        }
        prompt
    }
}

#[cfg(test)]
mod test_techniques {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn test_zero_shot_shape() {
        let prompt = zero_shot("Classify the sentiment.", "Great value!");
        assert_eq!(
            prompt,
            "Classify the sentiment.\n\nInput: Great value!\nOutput:"
        );
    }

    #[test]
    fn test_few_shot_lists_every_exemplar() {
        let exemplars = [
            Exemplar::new("Love it.", "positive"),
            Exemplar::new("Broke after one use.", "negative"),
        ];
        let prompt = few_shot("Classify the sentiment.", &exemplars, "It's okay.");
        assert_eq!(
            prompt,
            "Classify the sentiment.\n\n\
             Input: Love it.\nOutput: positive\n\n\
             Input: Broke after one use.\nOutput: negative\n\n\
             Input: It's okay.\nOutput:"
        );
    }

    #[test]
    fn test_few_shot_with_no_exemplars_is_zero_shot() {
        assert_eq!(
            few_shot("Task.", &[], "x"),
            zero_shot("Task.", "x")
        );
    }

    #[test]
    fn test_role_prompt() {
        let prompt = RolePrompt::new("a friendly coding bootcamp instructor")
            .goal("explain recursion to beginners")
            .constraint("use a real-world analogy")
            .constraint("keep it under 100 words");
        assert_eq!(
            prompt.build(),
            "You are a friendly coding bootcamp instructor. \
             Your goal is to explain recursion to beginners.\n\n\
             Constraints:\n- use a real-world analogy\n- keep it under 100 words"
        );
        assert_eq!(prompt.to_system_message().role, Role::System);
    }

    #[test]
    fn test_step_by_step_numbers_the_steps() {
        let prompt = step_by_step(
            "Solve this problem step by step:",
            &["Compute the discount", "State the final price"],
        );
        assert!(prompt.contains("Step 1: Compute the discount"));
        assert!(prompt.contains("Step 2: State the final price"));
        assert!(prompt.ends_with("Show your work for each step."));
    }

    #[test]
    fn test_guidance_blocks() {
        let guidance = Guidance::new()
            .prefer("start by acknowledging the situation")
            .prefer("offer a solution")
            .avoid("blaming the customer");
        let prompt = guidance.apply("Write an apology email.");
        assert!(prompt.starts_with("Write an apology email."));
        assert!(prompt.contains("DO:\n- start by acknowledging the situation\n- offer a solution"));
        assert!(prompt.contains("DON'T:\n- blaming the customer"));

        // empty blocks leave the task untouched
        assert_eq!(Guidance::new().apply("Task."), "Task.");
    }
}
