// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use super::support::*;
use fabstir_imagine_bot::bot::{ButtonTarget, Tone};
use serde_json::json;

fn stored_params() -> serde_json::Value {
    json!({
        "status": "completed",
        "params": {
            "prompt": "a red fox",
            "steps": 30,
            "seed": 99,
            "width": 512,
            "height": 640,
            "images": 2,
            "guidance_scale": 7.5,
            "model": "stable-diffusion-v1-5"
        }
    })
}

#[tokio::test]
async fn test_result_of_unfinished_task_shows_status() {
    let jobs = ScriptedJobs::new();
    jobs.on_get_statuses(images_url("abc123"), &["assigned"]);
    let surface = RecordingSurface::new();

    bot(&jobs).lookup_result(&surface, "abc123").await;

    assert_eq!(surface.sends(), 1);
    let embed = surface.last().embed.unwrap();
    assert_eq!(embed.title, "Task abc123");
    assert_eq!(embed.tone, Tone::Neutral);
    assert!(embed.description.unwrap().contains("assigned"));
}

#[tokio::test]
async fn test_result_of_completed_task_renders_with_params() {
    let jobs = ScriptedJobs::new();
    jobs.on_get(images_url("abc123"), vec![Ok(completed_payload())]);
    jobs.on_get(params_url("abc123"), vec![Ok(stored_params())]);
    let surface = RecordingSurface::new();

    bot(&jobs).lookup_result(&surface, "abc123").await;

    let reply = surface.last();
    let embed = reply.embed.as_ref().unwrap();
    assert_eq!(embed.title, "a red fox");
    assert!(embed.fields.iter().any(|f| f.name == "Size" && f.value == "512x640"));
    let labels: Vec<&str> = reply.buttons.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["#1", "#2", "Regenerate", "Share"]);
}

#[tokio::test]
async fn test_lookup_answers_before_calling_the_service() {
    let jobs = ScriptedJobs::new();
    jobs.on_get_statuses(images_url("abc123"), &["assigned"]);
    let surface = RecordingSurface::new();

    bot(&jobs).lookup_result(&surface, "abc123").await;

    let events = surface.events();
    assert_eq!(events.len(), 2);
    let Event::Sent(placeholder) = &events[0] else {
        panic!("first message must be the initial response");
    };
    assert_eq!(placeholder.embed.as_ref().unwrap().tone, Tone::Neutral);
    assert!(matches!(events[1], Event::Edited(_)));
}

#[tokio::test]
async fn test_regenerate_from_lookup_rounds_stored_size() {
    let jobs = ScriptedJobs::new();
    jobs.on_get(images_url("abc123"), vec![Ok(completed_payload())]);
    jobs.on_get(
        params_url("abc123"),
        vec![Ok(json!({
            "status": "completed",
            "params": { "prompt": "a red fox", "seed": 99, "width": 500, "height": 700 }
        }))],
    );
    jobs.on_post(format!("{}/generate", MODEL), task_created("def456"));
    jobs.on_get(images_url("def456"), vec![Ok(completed_payload())]);
    let bot = bot(&jobs);
    let surface = RecordingSurface::new();

    bot.lookup_result(&surface, "abc123").await;

    let reply = surface.last();
    let regenerate = reply
        .buttons
        .iter()
        .find(|b| b.label == "Regenerate")
        .expect("valid stored params offer regenerate");
    let ButtonTarget::Action(id) = &regenerate.target else {
        panic!("regenerate must be an action");
    };
    bot.handle_button(&RecordingSurface::new(), id).await;

    let posts = jobs.posts();
    assert_eq!(posts.len(), 1);
    let submitted = &posts[0].1["params"];
    assert_eq!(submitted["width"], 448);
    assert_eq!(submitted["height"], 640);
    assert_ne!(submitted["seed"], 99);
}

#[tokio::test]
async fn test_invalid_stored_params_offer_no_regenerate() {
    let jobs = ScriptedJobs::new();
    jobs.on_get(images_url("abc123"), vec![Ok(completed_payload())]);
    jobs.on_get(
        params_url("abc123"),
        vec![Ok(json!({
            "status": "completed",
            "params": { "prompt": "", "steps": 0, "seed": 1, "width": 500, "height": 9999 }
        }))],
    );
    let surface = RecordingSurface::new();

    bot(&jobs).lookup_result(&surface, "abc123").await;

    let reply = surface.last();
    assert_eq!(reply.embed.as_ref().unwrap().title, "Task abc123");
    let labels: Vec<&str> = reply.buttons.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["#1", "#2", "Share"]);
    assert!(jobs.posts().is_empty());
}

#[tokio::test]
async fn test_result_without_params_still_shows_images() {
    let jobs = ScriptedJobs::new();
    jobs.on_get(images_url("abc123"), vec![Ok(completed_payload())]);
    let surface = RecordingSurface::new();

    bot(&jobs).lookup_result(&surface, "abc123").await;

    let reply = surface.last();
    assert_eq!(reply.embed.as_ref().unwrap().title, "Task abc123");
    let labels: Vec<&str> = reply.buttons.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["#1", "#2", "Share"]);
}

#[tokio::test]
async fn test_result_of_unknown_task_is_request_error() {
    let jobs = ScriptedJobs::new();
    let surface = RecordingSurface::new();

    bot(&jobs).lookup_result(&surface, "nope").await;

    assert_eq!(surface.last().embed.unwrap().title, "Request Error");
}

#[tokio::test]
async fn test_params_lookup() {
    let jobs = ScriptedJobs::new();
    jobs.on_get(params_url("abc123"), vec![Ok(stored_params())]);
    let surface = RecordingSurface::new();

    bot(&jobs).lookup_params(&surface, "abc123").await;

    let embed = surface.last().embed.unwrap();
    assert_eq!(embed.title, "a red fox");
    assert!(embed.description.unwrap().contains("status : completed"));
    assert!(embed
        .fields
        .iter()
        .any(|f| f.name == "Model" && f.value == "stable-diffusion-v1-5"));
}

#[tokio::test]
async fn test_help_is_private() {
    let jobs = ScriptedJobs::new();
    let surface = RecordingSurface::new();

    bot(&jobs).help(&surface).await;

    assert!(surface.last().ephemeral);
    assert!(jobs.posts().is_empty());
}
