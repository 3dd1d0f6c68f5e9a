use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::audio::AudioSample;
use crate::config::Config;
use crate::lookup::{LookupClient, LookupError};
use crate::models::{PronunciationFeedback, SentenceRecord, WordRecord};

/// [`LookupClient`] backed by the Gemini `generateContent` REST endpoint in
/// JSON response mode.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
    native_language: String,
}

impl GeminiClient {
    pub fn new(api_key: String, api_url: String, model: String, native_language: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_url,
            model,
            native_language,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api_key.clone().unwrap_or_default(),
            config.api_url.clone(),
            config.model.clone(),
            config.native_language.clone(),
        )
    }

    async fn generate<T: DeserializeOwned>(&self, parts: Value) -> Result<T, LookupError> {
        if self.api_key.is_empty() {
            return Err(LookupError::MissingApiKey);
        }

        let url = format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        );
        let body = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "temperature": 0.2
            }
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if response.status() == 429 {
            return Err(LookupError::RateLimited);
        }

        if !response.status().is_success() {
            return Err(LookupError::Api(format!("HTTP {}", response.status())));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| LookupError::Malformed(format!("Failed to parse response: {}", e)))?;

        parse_candidate(&json)
    }

    fn word_prompt(&self, word: &str) -> String {
        format!(
            r#"Analyze the English word or phrase "{word}" for a learner whose native language is {lang}.
Respond with a single JSON object with these fields:
"word" (the headword as written), "meaning" (short primary meaning in {lang}),
"definition" (concise English definition), "ipa" (IPA transcription),
"part_of_speech", "examples" (2-3 objects with "english" and "translation" in {lang}),
"synonyms" (array), "antonyms" (array), "mnemonic" (a memory aid, in {lang})."#,
            word = word,
            lang = self.native_language
        )
    }

    fn sentence_prompt(&self, sentence: &str) -> String {
        format!(
            r#"Analyze the English sentence "{sentence}" for a learner whose native language is {lang}.
Respond with a single JSON object with these fields:
"sentence" (the sentence exactly as given), "translation" (natural {lang} translation),
"grammar" (array of objects with "segment" and "explanation" in {lang}),
"usage" (when and where the sentence is used, in {lang}),
"naturalness" (integer 0-100, how natural it sounds to a native speaker),
"similar" (2-3 objects with "english" and "translation")."#,
            sentence = sentence,
            lang = self.native_language
        )
    }

    fn pronunciation_prompt(&self, target: &str) -> String {
        format!(
            r#"The attached audio is a learner reading "{target}" aloud in English.
Rate the pronunciation and respond with a single JSON object with these fields:
"score" (integer 0-100), "feedback_english" (short feedback in English),
"feedback_native" (the same feedback in {lang}), "tips" (array of concrete tips)."#,
            target = target,
            lang = self.native_language
        )
    }
}

#[async_trait]
impl LookupClient for GeminiClient {
    async fn analyze_word(&self, text: &str) -> Result<WordRecord, LookupError> {
        let record: WordRecord = self
            .generate(json!([{ "text": self.word_prompt(text) }]))
            .await?;
        require("word", &record.word)?;
        require("meaning", &record.meaning)?;
        require("definition", &record.definition)?;
        Ok(record)
    }

    async fn analyze_sentence(&self, text: &str) -> Result<SentenceRecord, LookupError> {
        let mut record: SentenceRecord = self
            .generate(json!([{ "text": self.sentence_prompt(text) }]))
            .await?;
        require("translation", &record.translation)?;
        if record.sentence.trim().is_empty() {
            record.sentence = text.to_string();
        }
        Ok(record)
    }

    async fn check_pronunciation(
        &self,
        target: &str,
        audio: &AudioSample,
    ) -> Result<PronunciationFeedback, LookupError> {
        let parts = json!([
            { "text": self.pronunciation_prompt(target) },
            { "inline_data": { "mime_type": audio.mime_type, "data": audio.to_base64() } }
        ]);
        self.generate(parts).await
    }
}

fn parse_candidate<T: DeserializeOwned>(json: &Value) -> Result<T, LookupError> {
    let text = json["candidates"]
        .get(0)
        .and_then(|c| c["content"]["parts"].get(0))
        .and_then(|p| p["text"].as_str())
        .ok_or_else(|| LookupError::Malformed("No candidate text in response".to_string()))?;

    serde_json::from_str(strip_code_fence(text)).map_err(|e| LookupError::Malformed(e.to_string()))
}

// Models sometimes wrap JSON in a markdown fence even in JSON mode
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn require(field: &str, value: &str) -> Result<(), LookupError> {
    if value.trim().is_empty() {
        return Err(LookupError::Malformed(format!("missing required field '{}'", field)));
    }
    Ok(())
}
