//! Agents bundled with the demo server

use serde_json::{json, Map, Value};

use a2a_runtime::{
    agent::{handler_fn, AgentDescriptor},
    protocol::{AgentCapabilities, AgentError, AgentProvider, AgentSkill, Message, Part},
};

/// Replies with the text it receives
pub fn echo() -> AgentDescriptor {
    AgentDescriptor::new(
        "agent://echo",
        "Echo",
        handler_fn(|message: Message, ctx| async move {
            let text = message
                .text()
                .ok_or_else(|| AgentError::new("NO_TEXT", "message carries no text part"))?;
            ctx.logger.log(&format!("echoing {} bytes", text.len()));

            Ok::<_, AgentError>(Message::agent(text))
        }),
    )
    .with_description("Replies with the text of every message it receives")
    .with_version(env!("CARGO_PKG_VERSION"))
    .with_provider(AgentProvider::new("a2a-runtime"))
    .with_capabilities(AgentCapabilities::default().with_state_transition_history())
    .with_skill(
        AgentSkill::new("echo", "Echo")
            .with_description("Echo the message text back")
            .with_tag("demo")
            .with_example("hello"),
    )
}

/// Describes this server and the agents it hosts
pub fn about(hosted: Vec<String>) -> AgentDescriptor {
    AgentDescriptor::new(
        "agent://about",
        "About",
        handler_fn(move |_message: Message, ctx| {
            let hosted = hosted.clone();
            async move {
                let mut data = Map::new();
                data.insert("version".into(), json!(env!("CARGO_PKG_VERSION")));
                data.insert(
                    "agents".into(),
                    Value::Array(hosted.iter().cloned().map(Value::String).collect()),
                );
                data.insert("taskId".into(), json!(ctx.task_id));

                let summary = format!(
                    "a2a-runtime {} hosting {}",
                    env!("CARGO_PKG_VERSION"),
                    hosted.join(", ")
                );

                Ok::<_, AgentError>(Message::agent(summary).with_part(Part::data(data)))
            }
        }),
    )
    .with_description("Reports the runtime version and the hosted agents")
    .with_version(env!("CARGO_PKG_VERSION"))
    .with_output_modes(vec!["text".into(), "data".into()])
    .with_skill(AgentSkill::new("about", "About").with_tag("demo"))
}
