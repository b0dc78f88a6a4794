use llmswitch::{Assistant, Message, ProviderConfig};
use log::debug;

#[tokio::main]
async fn main()
{   dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(e) = run().await
    {   eprintln!("Error: {}", e);
        eprintln!();
        eprintln!("Make sure AI_PROVIDER and AI_API_KEY are set (or a .env file exists).");
        eprintln!("  AI_PROVIDER = openai | anthropic | ollama | github");
        std::process::exit(1);
    }
}

async fn run() -> llmswitch::Result<()>
{   let config = ProviderConfig::from_env();
    println!("Provider: {}", config.provider);
    println!("Model:    {}", config.model);
    println!("Endpoint: {}", config.endpoint());
    println!();

    let assistant = Assistant::from_config(config)?;
    debug!("Assistant ready: {}", assistant.provider_name());

    // free-form question from the command line, otherwise the demo script
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty()
    {   let reply = assistant.ask(&args.join(" ")).await?;
        println!("{}", reply.message);
        print_usage(&reply);
        return Ok(());
    }

    println!("Question: What is the capital of France?");
    let reply = assistant.ask("What is the capital of France?").await?;
    println!("Answer: {}", reply.message);
    print_usage(&reply);

    let mut turns = vec![Message::user("What is 2 + 2?")];
    let reply = assistant.chat(&turns).await?;
    println!("User: What is 2 + 2?");
    println!("Assistant: {}", reply.message);

    turns.push(Message::assistant(reply.message));
    turns.push(Message::user("Multiply that by 5"));
    let reply = assistant.chat(&turns).await?;
    println!("User: Multiply that by 5");
    println!("Assistant: {}", reply.message);
    print_usage(&reply);

    Ok(())
}

fn print_usage(reply: &llmswitch::AssistantResponse)
{   println!(
      "  [{} | {} in / {} out tokens]",
      reply.timestamp.format("%H:%M:%S"),
      reply.usage.input_tokens,
      reply.usage.output_tokens
    );
    println!();
}
