//! The prompting techniques side by side: zero-shot vs few-shot, role and goal,
//! step-by-step decomposition and DO/DON'T framing. Prompts are printed either way;
//! with OPENAI_API_KEY set, each one is also sent to gpt-3.5-turbo so the outputs can
//! be compared.

use promptmeter::llm::openai::OpenAiChat;
use promptmeter::llm::{ChatMessage, ChatProvider, ChatRequest};
use promptmeter::techniques::{
    chain_of_thought, few_shot, step_by_step, zero_shot, Exemplar, Guidance, RolePrompt,
};
use promptmeter::utils::postprocess::json::extract_json;

async fn run(client: &Option<OpenAiChat>, label: &str, prompt: &str) -> Option<String> {
    println!("\n--- {label} ---\n{prompt}");
    let client = client.as_ref()?;
    let request = ChatRequest::new("gpt-3.5-turbo", vec![ChatMessage::user(prompt)])
        .with_temperature(0.3)
        .with_max_tokens(100);
    match client.complete(&request).await {
        Ok(completion) => {
            println!("\n>>> {}", completion.text);
            Some(completion.text)
        }
        Err(error) => {
            eprintln!("call failed: {error:#}");
            None
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let client = match OpenAiChat::from_env() {
        Ok(client) => Some(client),
        Err(missing) => {
            eprintln!("{missing}; printing prompts without calling the API");
            None
        }
    };

    // Zero-shot vs few-shot sentiment classification.
    let task = "Classify the sentiment as positive, negative, or neutral.";
    let exemplars = [
        Exemplar::new("This product exceeded my expectations! Love it.", "positive"),
        Exemplar::new("Terrible quality. Broke after one use.", "negative"),
        Exemplar::new("It's okay, nothing special but does the job.", "neutral"),
    ];
    let test_input = "Great value for money, highly recommend!";
    run(&client, "zero-shot", &zero_shot(task, test_input)).await;
    run(&client, "few-shot", &few_shot(task, &exemplars, test_input)).await;

    // Few-shot structured extraction, salvaging the JSON from the reply.
    let extraction = few_shot(
        "Extract name, age, city and occupation as JSON. Use null for missing fields.",
        &[
            Exemplar::new(
                "John Smith, 32 years old, lives in Seattle, works as a Software Engineer",
                r#"{"name": "John Smith", "age": 32, "city": "Seattle", "occupation": "Software Engineer"}"#,
            ),
            Exemplar::new(
                "Sarah is 28 and from Boston",
                r#"{"name": "Sarah", "age": 28, "city": "Boston", "occupation": null}"#,
            ),
        ],
        "Mike Johnson, data analyst",
    );
    if let Some(reply) = run(&client, "few-shot extraction", &extraction).await {
        match extract_json(&reply) {
            Ok(value) => println!("parsed: {value}"),
            Err(error) => eprintln!("{error}"),
        }
    }

    // The same question through different personas.
    let question = "Explain what recursion is in programming.";
    for (title, role) in [
        (
            "professor",
            RolePrompt::new("a computer science professor teaching an advanced algorithms course"),
        ),
        (
            "bootcamp instructor",
            RolePrompt::new("a friendly coding bootcamp instructor teaching beginners")
                .goal("explain concepts using simple language and real-world analogies"),
        ),
        (
            "technical writer",
            RolePrompt::new("a technical writer creating documentation")
                .goal("be clear and concise")
                .constraint("include a simple example"),
        ),
    ] {
        let prompt = format!("{}\n\n{question}", role.build());
        run(&client, &format!("role: {title}"), &prompt).await;
    }

    // Step-by-step decomposition vs the bare question.
    let problem = "A store has 45 apples. They sell 60% in the morning. Then they \
                   receive a shipment of 30 more apples. How many apples do they have now?";
    run(&client, "bare", &format!("Solve: {problem}")).await;
    run(
        &client,
        "step-by-step",
        &step_by_step(
            &format!("Solve this problem step by step:\n\n{problem}"),
            &[
                "Calculate how many apples were sold (60% of 45)",
                "Calculate remaining apples after morning sales",
                "Add the new shipment",
                "State the final answer",
            ],
        ),
    )
    .await;
    run(&client, "chain of thought", &chain_of_thought(problem)).await;

    // Positive and negative framing on one task.
    let framed = Guidance::new()
        .prefer("start with acknowledging the situation")
        .prefer("explain the reason briefly (1-2 sentences)")
        .prefer("provide a new realistic timeline")
        .prefer("end with reassurance")
        .avoid("blaming anyone")
        .avoid("making promises you cannot keep")
        .apply("Write a professional email to a client about a project delay. Keep it under 150 words.");
    run(&client, "DO/DON'T framing", &framed).await;
}
