// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Slash command definitions and option parsing

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption, ResolvedOption, ResolvedValue};

use crate::config::limits::{GUIDANCE_SCALE_RANGE, IMAGES_RANGE, SEED_RANGE, STEPS_RANGE};
use crate::diffusion::types::{GenerationParams, ModelId, SchedulerId};

pub const GENERATE: &str = "generate";
pub const RESULT: &str = "result";
pub const PARAMS: &str = "params";
pub const HELP: &str = "help";

/// Option value detached from serenity's borrowed representation
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Text(String),
    Integer(i64),
    Number(f64),
}

/// Convert resolved options, dropping kinds the bot never declares
pub fn option_values(options: Vec<ResolvedOption<'_>>) -> Vec<(String, OptionValue)> {
    options
        .into_iter()
        .filter_map(|option| {
            let value = match option.value {
                ResolvedValue::String(s) => OptionValue::Text(s.to_string()),
                ResolvedValue::Integer(i) => OptionValue::Integer(i),
                ResolvedValue::Number(n) => OptionValue::Number(n),
                _ => return None,
            };
            Some((option.name.to_string(), value))
        })
        .collect()
}

/// Build `/generate` parameters from its options. Unknown names are ignored.
pub fn generation_params(options: &[(String, OptionValue)]) -> GenerationParams {
    let mut params = GenerationParams::default();
    for (name, value) in options {
        match (name.as_str(), value) {
            ("prompt", OptionValue::Text(s)) => params.prompt = s.clone(),
            ("steps", OptionValue::Integer(i)) => params.steps = Some(*i),
            ("seed", OptionValue::Integer(i)) => params.seed = Some(*i),
            ("width", OptionValue::Integer(i)) => params.width = Some(*i),
            ("height", OptionValue::Integer(i)) => params.height = Some(*i),
            ("images", OptionValue::Integer(i)) => params.images = Some(*i),
            ("guidance_scale", OptionValue::Number(n)) => params.guidance_scale = Some(*n),
            ("guidance_scale", OptionValue::Integer(i)) => {
                params.guidance_scale = Some(*i as f64)
            }
            ("model", OptionValue::Text(s)) => params.model = Some(s.clone()),
            ("scheduler", OptionValue::Text(s)) => params.scheduler = Some(s.clone()),
            ("negative_prompt", OptionValue::Text(s)) => params.negative_prompt = Some(s.clone()),
            _ => {}
        }
    }
    params
}

/// Value of the `task_id` option of the lookup commands. Blank ids and the
/// dot segments `.` and `..` are treated as missing.
pub fn task_id_option(options: &[(String, OptionValue)]) -> Option<String> {
    options.iter().find_map(|(name, value)| match (name.as_str(), value) {
        ("task_id", OptionValue::Text(s)) => {
            let id = s.trim();
            (!matches!(id, "" | "." | "..")).then(|| id.to_string())
        }
        _ => None,
    })
}

/// Every command the bot registers
pub fn definitions() -> Vec<CreateCommand> {
    let mut model = CreateCommandOption::new(
        CommandOptionType::String,
        "model",
        "Diffusion model",
    );
    for m in ModelId::ALL {
        model = model.add_string_choice(m.as_str(), m.as_str());
    }

    let mut scheduler = CreateCommandOption::new(
        CommandOptionType::String,
        "scheduler",
        "Noise scheduler",
    );
    for s in SchedulerId::ALL {
        scheduler = scheduler.add_string_choice(s.as_str(), s.as_str());
    }

    // Width, height and seed bounds are enforced by the normaliser so that
    // off-grid sizes are rounded rather than refused by Discord.
    let generate = CreateCommand::new(GENERATE)
        .description("Generate Image")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "prompt",
                "try adding increments to your prompt such as 'oil on canvas', 'a painting', 'a book cover'",
            )
            .required(true),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Integer,
                "steps",
                "more steps can increase quality but will take longer to generate",
            )
            .min_int_value(*STEPS_RANGE.start() as u64)
            .max_int_value(*STEPS_RANGE.end() as u64),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::Integer, "seed", "Random seed")
                .min_int_value(*SEED_RANGE.start() as u64)
                .max_int_value(*SEED_RANGE.end() as u64),
        )
        .add_option(CreateCommandOption::new(
            CommandOptionType::Integer,
            "width",
            "Image width",
        ))
        .add_option(CreateCommandOption::new(
            CommandOptionType::Integer,
            "height",
            "Image height",
        ))
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Integer,
                "images",
                "How many images you wish to generate",
            )
            .min_int_value(*IMAGES_RANGE.start() as u64)
            .max_int_value(*IMAGES_RANGE.end() as u64),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Number,
                "guidance_scale",
                "how much the prompt will influence the results",
            )
            .min_number_value(*GUIDANCE_SCALE_RANGE.start())
            .max_number_value(*GUIDANCE_SCALE_RANGE.end()),
        )
        .add_option(model)
        .add_option(scheduler)
        .add_option(CreateCommandOption::new(
            CommandOptionType::String,
            "negative_prompt",
            "what the image should not contain",
        ));

    let task_id = || {
        CreateCommandOption::new(CommandOptionType::String, "task_id", "Task id").required(true)
    };

    vec![
        generate,
        CreateCommand::new(RESULT)
            .description("Show the images of a task")
            .add_option(task_id()),
        CreateCommand::new(PARAMS)
            .description("Show the parameters of a task")
            .add_option(task_id()),
        CreateCommand::new(HELP).description("How to use the bot"),
    ]
}
