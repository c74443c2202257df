mod common;

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use common::{png_bytes, solid};
use compose_board::error::{GenerationError, JobError};
use compose_board::{EditorError, EditorResult, EditorState, GeneratedImage, Generator, LayerId};
use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::BoxFuture;

/// Backend that holds its job open until the test releases it
struct Gated {
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    outcome: Result<GeneratedImage, GenerationError>,
}

impl Gated {
    fn new(outcome: Result<GeneratedImage, GenerationError>) -> (Arc<Self>, oneshot::Sender<()>) {
        let (release, gate) = oneshot::channel();
        let generator = Arc::new(Self {
            gate: Mutex::new(Some(gate)),
            outcome,
        });
        (generator, release)
    }
}

impl Generator for Gated {
    fn generate(&self, _png: Vec<u8>) -> BoxFuture<'static, Result<GeneratedImage, JobError>> {
        let gate = self.gate.lock().unwrap().take();
        let outcome = self.outcome.clone().map_err(JobError::from);
        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            outcome
        }
        .boxed()
    }
}

fn generated() -> GeneratedImage {
    GeneratedImage {
        reference: "ComfyUI_00001_.png".to_string(),
        bytes: png_bytes(30, 30, [9, 9, 9, 255]),
    }
}

fn poll_until_done(state: &mut EditorState) -> EditorResult<Option<LayerId>> {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(outcome) = state.poll_generation() {
            return outcome;
        }
        assert!(Instant::now() < deadline, "generation never finished");
        thread::sleep(Duration::from_millis(5));
    }
}

fn state_with_layer() -> EditorState {
    let mut state = EditorState::new(400, 300);
    state.add_bitmap(solid(50, 50, [0, 0, 0, 255])).unwrap();
    state
}

#[test]
fn test_second_request_rejected_while_running() {
    let mut state = state_with_layer();
    let (generator, release) = Gated::new(Ok(generated()));

    state.start_generation(generator.clone()).unwrap();
    assert!(state.is_generating());
    assert!(matches!(
        state.start_generation(generator),
        Err(EditorError::GenerationInFlight)
    ));

    release.send(()).unwrap();
    poll_until_done(&mut state).unwrap();
    assert!(!state.is_generating());
}

#[test]
fn test_result_lands_as_selected_layer() {
    let mut state = state_with_layer();
    let (generator, release) = Gated::new(Ok(generated()));

    state.start_generation(generator).unwrap();
    assert!(state.poll_generation().is_none());
    release.send(()).unwrap();

    let id = poll_until_done(&mut state).unwrap().unwrap();
    assert_eq!(state.document().len(), 2);
    assert_eq!(state.document().selected_id(), Some(&id));
    let layer = state.document().get(&id).unwrap();
    assert_eq!((layer.natural_width, layer.natural_height), (30, 30));
}

#[test]
fn test_backend_failure_is_reported_and_slot_freed() {
    let mut state = state_with_layer();
    let failure = GenerationError {
        kind: "ValueError".to_string(),
        node: Some("CheckpointLoader (ID: 4)".to_string()),
        message: "model not found".to_string(),
        trace: None,
    };
    let (generator, release) = Gated::new(Err(failure));

    state.start_generation(generator).unwrap();
    release.send(()).unwrap();

    match poll_until_done(&mut state) {
        Err(EditorError::Generation(e)) => {
            assert_eq!(e.to_string(), "ValueError: model not found");
            assert_eq!(e.node.as_deref(), Some("CheckpointLoader (ID: 4)"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(state.document().len(), 1);

    // A fresh job can start once the failed one is collected
    let (generator, release) = Gated::new(Ok(generated()));
    state.start_generation(generator).unwrap();
    release.send(()).unwrap();
    assert!(poll_until_done(&mut state).unwrap().is_some());
}
