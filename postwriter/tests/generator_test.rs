mod fakes;

use fakes::{generator, FakeNews, ScriptedLlm};
use postwriter::error::ContentError;
use postwriter::generator::GeneratedContent;

#[tokio::test]
async fn three_steps_produce_trimmed_content() {
    let llm = ScriptedLlm::new(vec![
        Ok("  Rust Takes Over  "),
        Ok("\nEverything about Rust\n"),
        Ok("  Long body text.  "),
    ]);
    let writer = generator(FakeNews::Headlines("A\nB\nC".into()), llm.clone());

    let content = writer.generate_content("rust").await.expect("generate");

    assert_eq!(
        content,
        GeneratedContent {
            title: "Rust Takes Over".into(),
            meta_description: "Everything about Rust".into(),
            post_content: "Long body text.".into(),
        }
    );
    assert_eq!(llm.requests().len(), 3);
}

#[tokio::test]
async fn prompts_chain_topic_news_and_title() {
    let llm = ScriptedLlm::new(vec![Ok("The Title"), Ok("meta"), Ok("body")]);
    let writer = generator(FakeNews::Headlines("A\nB\nC".into()), llm.clone());

    writer.generate_content("quantum computing").await.expect("generate");
    let requests = llm.requests();

    let title = &requests[0];
    assert!(title.prompt.contains("quantum computing"));
    assert!(title.prompt.contains("A\nB\nC"));
    assert_eq!(title.max_tokens, Some(60));
    assert_eq!(title.temperature, Some(0.5));
    assert_eq!(title.stop, vec!["\n".to_string()]);

    let meta = &requests[1];
    assert!(meta.prompt.contains("'The Title'"));
    assert!(!meta.prompt.contains("A\nB\nC"));
    assert_eq!(meta.max_tokens, Some(120));
    assert_eq!(meta.temperature, Some(0.5));
    assert_eq!(meta.stop, vec![".".to_string()]);

    let body = &requests[2];
    assert!(body.prompt.contains("quantum computing"));
    assert!(body.prompt.contains("A\nB\nC"));
    assert!(!body.prompt.contains("The Title"));
    assert_eq!(body.max_tokens, Some(1500));
    assert_eq!(body.temperature, Some(0.5));
    assert!(body.stop.is_empty());
    assert_eq!(body.presence_penalty, Some(0.6));
    assert_eq!(body.frequency_penalty, Some(0.6));
}

#[tokio::test]
async fn empty_model_output_becomes_empty_field() {
    let llm = ScriptedLlm::new(vec![Ok(""), Ok("   "), Ok("body")]);
    let writer = generator(FakeNews::Headlines("A".into()), llm.clone());

    let content = writer.generate_content("x").await.expect("generate");
    assert_eq!(content.title, "");
    assert_eq!(content.meta_description, "");
    assert_eq!(content.post_content, "body");
    assert!(llm.requests()[1].prompt.contains("titled: ''"));
}

#[tokio::test]
async fn failure_at_any_step_is_a_generation_error() {
    for failing_step in 0..3 {
        let mut replies: Vec<Result<&str, &str>> = vec![Ok("t"), Ok("m"), Ok("b")];
        replies[failing_step] = Err("LLM API error 503 Service Unavailable: overloaded");
        let llm = ScriptedLlm::new(replies);
        let writer = generator(FakeNews::Headlines("A".into()), llm.clone());

        let err = writer.generate_content("x").await.unwrap_err();

        assert_eq!(err.status_code(), 500, "step {}", failing_step);
        match &err {
            ContentError::Generation(msg) => assert!(msg.contains("overloaded")),
            other => panic!("expected generation error, got {:?}", other),
        }
        // Nothing after the failing step is attempted
        assert_eq!(llm.requests().len(), failing_step + 1);
    }
}

#[tokio::test]
async fn upstream_news_error_passes_through() {
    let llm = ScriptedLlm::new(vec![]);
    let writer = generator(FakeNews::Upstream(429, "quota exceeded".into()), llm.clone());

    let err = writer.generate_content("x").await.unwrap_err();

    match err {
        ContentError::Upstream { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
    assert!(llm.requests().is_empty());
}

#[tokio::test]
async fn unreachable_news_is_internal() {
    let llm = ScriptedLlm::new(vec![]);
    let writer = generator(FakeNews::Unreachable, llm.clone());

    let err = writer.generate_content("x").await.unwrap_err();

    assert!(matches!(err, ContentError::Internal(_)));
    assert_eq!(err.status_code(), 500);
    assert!(err.to_string().contains("connection refused"));
    assert!(llm.requests().is_empty());
}
