use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::{AppError, AppResult, CorpusError};

use super::answers::AnswerReader;
use super::requests::RequestReader;
use super::types::{Bullet, Request, Response};
use super::{CORPUS_QUEUE_CAPACITY, CorpusConfig};

/// Immutable, shareable sequence of bullets. Built once before any load runs.
#[derive(Debug, Clone)]
pub struct BulletStore {
    bullets: Arc<[Bullet]>,
    parsed: usize,
}

impl BulletStore {
    /// Loads the phase corpus, pairing requests and answers in lockstep.
    ///
    /// Each file is parsed by its own blocking producer feeding a bounded
    /// channel; the first error on either side aborts the load.
    ///
    /// # Errors
    ///
    /// Returns an error when a file is missing or malformed, or when the
    /// answers run out before the requests do. Answer lines past the last
    /// request are still parsed.
    pub async fn load(config: &CorpusConfig) -> AppResult<Self> {
        let request_path = config.phase.request_file(&config.root);
        let answer_path = config.phase.answer_file(&config.root);
        info!(
            "Loading phase {} corpus: {} / {}",
            config.phase.number(),
            request_path.display(),
            answer_path.display()
        );
        if let Some(filter) = config.filters.request_line.as_ref() {
            info!("...using filter {:?}", filter.as_str());
        }
        if let Some(filter) = config.filters.uri.as_deref() {
            info!("...using URI filter {:?}", String::from_utf8_lossy(filter));
        }

        let requests = RequestReader::open(&request_path, config.filters.clone())?;
        let answers = AnswerReader::open(&answer_path)?;
        let mut request_rx = spawn_producer(requests);
        let mut answer_rx = spawn_producer(answers);

        let mut pairing = Pairing::default();
        while let Some(request) = request_rx.recv().await {
            let request = request?;
            let response = match answer_rx.recv().await {
                Some(response) => response?,
                None => {
                    return Err(AppError::corpus(CorpusError::InsufficientAnswers {
                        requests: pairing.parsed(),
                    }));
                }
            };
            pairing.push(request, response);
        }
        let mut surplus: usize = 0;
        while let Some(response) = answer_rx.recv().await {
            response?;
            surplus = surplus.saturating_add(1);
        }
        log_surplus(surplus);

        let store = pairing.finish();
        info!(
            "bullets count: {} ({} parsed, {} skipped)",
            store.len(),
            store.parsed(),
            store.skipped()
        );
        Ok(store)
    }

    /// Pairs two already-parsed streams positionally.
    ///
    /// # Errors
    ///
    /// Returns the first parse error of either stream, including answers
    /// past the last request, or [`CorpusError::InsufficientAnswers`].
    pub fn pair<I, J>(requests: I, answers: J) -> Result<Self, CorpusError>
    where
        I: IntoIterator<Item = Result<Request, CorpusError>>,
        J: IntoIterator<Item = Result<Response, CorpusError>>,
    {
        let mut answers = answers.into_iter();
        let mut pairing = Pairing::default();
        for request in requests {
            let request = request?;
            let response = answers
                .next()
                .ok_or(CorpusError::InsufficientAnswers {
                    requests: pairing.parsed(),
                })??;
            pairing.push(request, response);
        }
        let mut surplus: usize = 0;
        for response in answers {
            response?;
            surplus = surplus.saturating_add(1);
        }
        log_surplus(surplus);
        Ok(pairing.finish())
    }

    #[must_use]
    pub fn from_bullets(bullets: Vec<Bullet>) -> Self {
        let parsed = bullets.len();
        Self {
            bullets: bullets.into(),
            parsed,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bullets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bullets.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Bullet> {
        self.bullets.get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bullet> {
        self.bullets.iter()
    }

    /// Requests read from the corpus, skipped ones included.
    #[must_use]
    pub const fn parsed(&self) -> usize {
        self.parsed
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.parsed.saturating_sub(self.bullets.len())
    }
}

/// Accumulates request/answer pairs, dropping skipped requests after they
/// have consumed their answer.
#[derive(Debug, Default)]
pub struct Pairing {
    bullets: Vec<Bullet>,
    parsed: usize,
}

impl Pairing {
    pub fn push(&mut self, request: Request, response: Response) {
        self.parsed = self.parsed.saturating_add(1);
        if request.skip {
            return;
        }
        self.bullets.push(Bullet { request, response });
    }

    #[must_use]
    pub const fn parsed(&self) -> usize {
        self.parsed
    }

    #[must_use]
    pub fn finish(self) -> BulletStore {
        BulletStore {
            bullets: self.bullets.into(),
            parsed: self.parsed,
        }
    }
}

fn log_surplus(surplus: usize) {
    if surplus > 0 {
        debug!(
            "Answer corpus has {} more lines than the request corpus; extra answers ignored.",
            surplus
        );
    }
}

fn spawn_producer<I, T>(records: I) -> mpsc::Receiver<Result<T, CorpusError>>
where
    I: Iterator<Item = Result<T, CorpusError>> + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel(CORPUS_QUEUE_CAPACITY);
    tokio::task::spawn_blocking(move || {
        for record in records {
            let failed = record.is_err();
            // A closed channel means the consumer already gave up.
            if tx.blocking_send(record).is_err() || failed {
                break;
            }
        }
    });
    rx
}
