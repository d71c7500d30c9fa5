// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use super::support::*;
use fabstir_imagine_bot::bot::{ButtonTarget, Tone};
use fabstir_imagine_bot::diffusion::{GenerationParams, RawErrorBody};
use serde_json::json;

fn cat_500() -> GenerationParams {
    GenerationParams {
        width: Some(500),
        ..GenerationParams::new("a cat")
    }
}

#[tokio::test]
async fn test_generate_rounds_width_and_renders_without_status_edits() {
    let jobs = ScriptedJobs::new();
    jobs.on_post(format!("{}/generate", MODEL), task_created("abc123"));
    jobs.on_get(
        images_url("abc123"),
        vec![Ok(json!({"status": "pending"})), Ok(json!({"status": "pending"})), Ok(completed_payload())],
    );
    let surface = RecordingSurface::new();

    bot(&jobs).generate(&surface, cat_500()).await;

    let posts = jobs.posts();
    assert_eq!(posts.len(), 1);
    let body = &posts[0].1;
    assert_eq!(body["params"]["width"], 448);
    assert_eq!(body["params"]["height"], 512);
    assert_eq!(body["params"]["prompt"], "a cat");
    assert!(body["params"]["seed"].is_u64());
    assert_eq!(body["discord"]["user_id"], "42");

    assert_eq!(surface.sends(), 1);
    assert!(surface.status_edits().is_empty());
    assert_eq!(jobs.get_count(&images_url("abc123")), 3);

    let events = surface.events();
    assert!(matches!(events[0], Event::Sent(_)));
    assert!(events[1..].iter().all(|e| matches!(e, Event::Edited(_))));

    let last = surface.last();
    let embed = last.embed.as_ref().unwrap();
    assert_eq!(embed.title, "a cat");
    assert_eq!(embed.tone, Tone::Caution);
    assert_eq!(embed.image_url.as_deref(), Some("https://cdn.test/grid.png"));
    let description = embed.description.as_deref().unwrap();
    assert!(description.contains("task id : abc123"));
    assert!(description.contains("width must be a multiple of 64"));
    assert!(description.contains("changed width value from 500 to 448"));
    assert!(!description.contains("height"));
}

#[tokio::test]
async fn test_single_transition_edits_once() {
    let jobs = ScriptedJobs::new();
    jobs.on_post(format!("{}/generate", MODEL), task_created("abc123"));
    jobs.on_get(
        images_url("abc123"),
        vec![
            Ok(json!({"status": "pending"})),
            Ok(json!({"status": "assigned"})),
            Ok(json!({"status": "assigned"})),
            Ok(completed_payload()),
        ],
    );
    let surface = RecordingSurface::new();

    bot(&jobs).generate(&surface, GenerationParams::new("a cat")).await;

    assert_eq!(
        surface.status_edits(),
        vec!["<@42> Your task's status is updated from pending to assigned".to_string()]
    );
    assert_eq!(
        surface.last().content.as_deref(),
        Some("<@42> Your task is completed.")
    );
}

#[tokio::test]
async fn test_timeout_reports_task_id() {
    let jobs = ScriptedJobs::new();
    jobs.on_post(format!("{}/generate", MODEL), task_created("abc123"));
    jobs.on_get_statuses(images_url("abc123"), &["assigned"]);
    let surface = RecordingSurface::new();

    bot(&jobs).generate(&surface, GenerationParams::new("a cat")).await;

    assert_eq!(jobs.get_count(&images_url("abc123")), 300);
    assert_eq!(surface.sends(), 1);
    assert!(matches!(surface.events().last(), Some(Event::Edited(_))));
    let embed = surface.last().embed.unwrap();
    assert_eq!(embed.title, "Timeout Error");
    assert!(embed.description.unwrap().contains("abc123"));
}

#[tokio::test]
async fn test_task_error_stops_immediately() {
    let jobs = ScriptedJobs::new();
    jobs.on_post(format!("{}/generate", MODEL), task_created("abc123"));
    jobs.on_get_statuses(
        images_url("abc123"),
        &["pending", "assigned", "assigned", "assigned", "error", "completed"],
    );
    let surface = RecordingSurface::new();

    bot(&jobs).generate(&surface, GenerationParams::new("a cat")).await;

    assert_eq!(jobs.get_count(&images_url("abc123")), 5);
    let embed = surface.last().embed.unwrap();
    assert_eq!(embed.title, "Task Error");
    assert!(embed.description.unwrap().contains("abc123"));
}

#[tokio::test]
async fn test_validation_error_sent_privately_without_submitting() {
    let jobs = ScriptedJobs::new();
    let surface = RecordingSurface::new();
    let params = GenerationParams {
        steps: Some(500),
        images: Some(9),
        ..GenerationParams::new("a cat")
    };

    bot(&jobs).generate(&surface, params).await;

    assert!(jobs.posts().is_empty());
    assert_eq!(surface.events().len(), 1);
    let reply = surface.last();
    assert!(reply.ephemeral);
    let description = reply.embed.unwrap().description.unwrap();
    assert!(description.contains("steps"));
    assert!(description.contains("images"));
    assert!(!description.contains("width"));
}

#[tokio::test]
async fn test_submission_failure_edits_request_error() {
    let jobs = ScriptedJobs::new();
    jobs.on_post(
        format!("{}/generate", MODEL),
        Err(RawErrorBody {
            status: Some(503),
            body: "busy".to_string(),
        }),
    );
    let surface = RecordingSurface::new();

    bot(&jobs).generate(&surface, GenerationParams::new("a cat")).await;

    assert_eq!(surface.sends(), 1);
    assert_eq!(surface.events().len(), 2);
    assert_eq!(surface.last().embed.unwrap().title, "Request Error");
}

#[tokio::test]
async fn test_proof_link_added_after_render() {
    let jobs = ScriptedJobs::new();
    jobs.on_post(format!("{}/generate", MODEL), task_created("abc123"));
    jobs.on_get(images_url("abc123"), vec![Ok(completed_payload())]);
    jobs.on_get(
        tx_hash_url("abc123"),
        vec![
            Ok(json!({"status": "pending"})),
            Ok(json!({"status": "completed", "tx_hash": {"completed": "0xfeed"}})),
        ],
    );
    let surface = RecordingSurface::new();

    bot(&jobs).generate(&surface, GenerationParams::new("a cat")).await;

    let last = surface.last();
    let proof = last.buttons.last().unwrap();
    assert_eq!(proof.label, "Transaction");
    assert_eq!(
        proof.target,
        ButtonTarget::Link("https://sepolia.basescan.org/tx/0xfeed".to_string())
    );
    // Proof polling never produces status edits
    assert!(surface.status_edits().is_empty());
}

#[tokio::test]
async fn test_missing_proof_keeps_rendered_result() {
    let jobs = ScriptedJobs::new();
    jobs.on_post(format!("{}/generate", MODEL), task_created("abc123"));
    jobs.on_get(images_url("abc123"), vec![Ok(completed_payload())]);
    let surface = RecordingSurface::new();

    bot(&jobs).generate(&surface, GenerationParams::new("a cat")).await;

    assert_eq!(jobs.get_count(&tx_hash_url("abc123")), 3);
    let last = surface.last();
    assert_eq!(last.content.as_deref(), Some("<@42> Your task is completed."));
    assert!(!last.buttons.iter().any(|b| b.label == "Transaction"));
}

#[tokio::test]
async fn test_filtered_origin_only_behind_image_button() {
    let jobs = ScriptedJobs::new();
    jobs.on_post(format!("{}/generate", MODEL), task_created("abc123"));
    jobs.on_get(images_url("abc123"), vec![Ok(completed_payload())]);
    let surface = RecordingSurface::new();
    let bot = bot(&jobs);

    bot.generate(&surface, GenerationParams::new("a cat")).await;

    let last = surface.last();
    assert!(!format!("{:?}", last).contains("https://cdn.test/2.png"));

    let ButtonTarget::Action(id) = &last.buttons[1].target else {
        panic!("second image button must be an action");
    };
    let viewer = RecordingSurface::new();
    bot.handle_button(&viewer, id).await;
    let shown = viewer.last();
    assert!(shown.ephemeral);
    assert_eq!(
        shown.embed.unwrap().image_url.as_deref(),
        Some("https://cdn.test/2.png")
    );
}
