//! Token counting walkthrough: segmentation, conversation overhead, context limits and
//! prompt efficiency. Runs fully offline.

use promptmeter::llm::ChatMessage;
use promptmeter::pricing::PricingTable;
use promptmeter::utils::printing::{print_markdown, segmentation_report};
use promptmeter::utils::token::tiktoken::Tiktoken;
use promptmeter::utils::token::{analyze_efficiency, CountToken};

fn visualize(tokenizer: &Tiktoken, text: &str) {
    let pieces = tokenizer.segment(text);
    print_markdown(&segmentation_report(text, &pieces));
}

fn main() -> anyhow::Result<()> {
    let tokenizer = Tiktoken::new("gpt-3.5-turbo")?;

    // How different kinds of text tokenize. Punctuation, rare words, code and
    // non-Latin scripts all fragment differently.
    for text in [
        "Hello, world!",
        "The quick brown fox jumps over the lazy dog.",
        "artificial intelligence",
        "AI",
        "uncommonword123",
        "日本語のテキスト",
        "def hello_world():",
        "https://www.example.com/path?query=value",
    ] {
        visualize(&tokenizer, text);
    }

    // What a chat conversation really costs on the wire.
    let messages = [
        ChatMessage::system("You are a helpful coding assistant."),
        ChatMessage::user("How do I reverse a list in Python?"),
        ChatMessage::assistant("You can use list.reverse() or list[::-1]"),
        ChatMessage::user("What's the difference between them?"),
    ];
    let counts = tokenizer.count_conversation(&messages);
    print_markdown(&format!(
        "# Conversation estimate\n\n\
         * system: {} tokens\n\
         * user: {} tokens\n\
         * assistant: {} tokens\n\
         * wire overhead: {} tokens\n\
         * **total: {} tokens**\n",
        counts.system,
        counts.user,
        counts.assistant,
        counts.overhead,
        counts.total(),
    ));

    // Which models a long prompt still fits into, leaving 20% headroom for the reply.
    let long_text = "AI ".repeat(1000);
    let token_count = tokenizer.count_token(&long_text) as u64;
    println!("\nSample text is {token_count} tokens. Model compatibility:");
    let table = PricingTable::builtin();
    for name in table.model_names() {
        let pricing = table.lookup(name)?;
        let headroom = pricing.context_limit * 8 / 10;
        let verdict = if token_count < headroom { "fits" } else { "too large" };
        println!("  {name}: {} token window, {verdict}", pricing.context_limit);
    }

    // Prompt efficiency: short common words are cheap, padding is not.
    for prompt in [
        "What is AI?",
        "Please provide a comprehensive, detailed explanation of artificial \
         intelligence, including its history, current applications, and future prospects.",
    ] {
        let report = analyze_efficiency(prompt, &tokenizer);
        println!(
            "\n\"{prompt}\"\n  {} chars, {} words, {} tokens, {:.2} tokens/word, rating {:?}",
            report.chars,
            report.words,
            report.tokens,
            report.tokens_per_word(),
            report.rating(),
        );
    }

    Ok(())
}
