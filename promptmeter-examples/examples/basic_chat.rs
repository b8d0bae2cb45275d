//! Send the same prompt to OpenAI and Anthropic and compare the replies and their token
//! bills. Needs OPENAI_API_KEY and/or ANTHROPIC_API_KEY (a .env file works); a missing
//! key skips that provider.

use promptmeter::llm::anthropic::AnthropicChat;
use promptmeter::llm::openai::OpenAiChat;
use promptmeter::llm::{ChatMessage, ChatProvider, ChatRequest, Completion};

fn report(provider: &str, completion: &Completion) {
    println!("\n== {provider} ({}) ==", completion.model);
    println!("{}", completion.text);
    println!(
        "tokens: {} input, {} output, {} total",
        completion.input_tokens, completion.output_tokens, completion.total_tokens
    );
}

async fn compare_providers(prompt: &str) {
    println!("\nPROMPT: {prompt}");
    let messages = vec![
        ChatMessage::system("You are a helpful assistant."),
        ChatMessage::user(prompt),
    ];

    match OpenAiChat::from_env() {
        Ok(client) => {
            let request = ChatRequest::new("gpt-3.5-turbo", messages.clone());
            match client.complete(&request).await {
                Ok(completion) => report("OpenAI", &completion),
                Err(error) => eprintln!("OpenAI call failed: {error:#}"),
            }
        }
        Err(missing) => eprintln!("skipping OpenAI: {missing}"),
    }

    match AnthropicChat::from_env() {
        Ok(client) => {
            let request = ChatRequest::new("claude-3-haiku-20240307", messages);
            match client.complete(&request).await {
                Ok(completion) => report("Anthropic", &completion),
                Err(error) => eprintln!("Anthropic call failed: {error:#}"),
            }
        }
        Err(missing) => eprintln!("skipping Anthropic: {missing}"),
    }
}

async fn temperature_effect(prompt: &str) {
    let client = match OpenAiChat::from_env() {
        Ok(client) => client,
        Err(missing) => {
            eprintln!("skipping temperature demo: {missing}");
            return;
        }
    };
    println!("\nTEMPERATURE EFFECT: {prompt}");
    for temperature in [0.0, 0.7, 1.5] {
        println!("\ntemperature = {temperature}");
        // two calls at the same temperature show how consistent replies are
        for _ in 0..2 {
            let request = ChatRequest::new("gpt-3.5-turbo", vec![ChatMessage::user(prompt)])
                .with_temperature(temperature)
                .with_max_tokens(50);
            match client.complete(&request).await {
                Ok(completion) => println!("  {}", completion.text.replace('\n', " ")),
                Err(error) => eprintln!("  call failed: {error:#}"),
            }
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    compare_providers("What is the capital of France?").await;
    compare_providers("Write a haiku about artificial intelligence.").await;
    temperature_effect("Generate a creative name for a coffee shop.").await;
}
