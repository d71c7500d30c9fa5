// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Share and transaction explorer links

use url::Url;

use super::messages::truncate_title;
use crate::config::Environment;

const SHARE_INTENT: &str = "https://twitter.com/intent/tweet";

/// Public page of a finished task
pub fn result_page_url(task_id: &str, environment: Environment) -> String {
    format!("{}/{}", environment.hosts().result_page, task_id)
}

/// Tweet intent carrying a short promotional text and the result page link
pub fn share_url(prompt: &str, task_id: &str, environment: Environment) -> String {
    let text = format!(
        "Check out what I imagined with Fabstir Imagine: \"{}\" #FabstirImagine #AIart",
        truncate_title(prompt)
    );
    let page = result_page_url(task_id, environment);
    match Url::parse_with_params(SHARE_INTENT, &[("text", text.as_str()), ("url", page.as_str())]) {
        Ok(url) => url.to_string(),
        Err(_) => page,
    }
}

/// Block explorer page of a transaction
pub fn tx_explorer_url(tx_hash: &str, environment: Environment) -> String {
    format!("{}{}", environment.hosts().tx_explorer, tx_hash)
}
