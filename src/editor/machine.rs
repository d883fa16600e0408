// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Draw/edit state machine.
//!
//! The machine turns pointer input and playback time into annotation drafts.
//! It is a plain value: [`Machine::step`] consumes it and hands back the next
//! machine together with at most one [`Effect`] for the caller to carry out.
//! It never touches the store or the annotation collection itself.
//!
//! ```text
//! Idle --down--> Drawing --move--> Drawing --up/commit--> Idle
//! Idle --select(i)--> Editing --down/move/up--> Editing --commit/cancel/delete--> Idle
//! ```

use thiserror::Error;

use crate::models::annotation::{Annotation, AnnotationDraft, AnnotationId};
use crate::util::geometry::{rect_from_drag, Point, Rect};
use crate::util::time::is_valid_time;

/// In-progress rectangle between pointer-down and commit/cancel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawSession {
    pub start: Point,
    pub current: Point,
    /// Whether the pointer is still held.
    pub active: bool,
}

impl DrawSession {
    pub fn begin(at: Point) -> Self {
        Self {
            start: at,
            current: at,
            active: true,
        }
    }

    /// A resting session covering an existing rectangle.
    pub fn covering(rect: Rect) -> Self {
        Self {
            start: Point::new(rect.x, rect.y),
            current: rect.far_corner(),
            active: false,
        }
    }

    pub fn rect(&self) -> Rect {
        rect_from_drag(self.start, self.current)
    }
}

/// Authoring mode.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Drawing(DrawSession),
    Editing {
        session: DrawSession,
        /// Index of the edited record in the committed collection.
        target: usize,
        id: AnnotationId,
        /// Time the record is bound to; playback updates are not observed
        /// while editing.
        time: f64,
    },
}

/// Input events understood by the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    Commit,
    Cancel,
    Delete,
    Select(usize),
    TimeUpdate(f64),
    SetTag(String),
    SetColor(String),
    /// The displayed video changed.
    Reset,
}

/// Why a commit was dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("nothing has been drawn")]
    NoSession,
    #[error("no tag selected")]
    EmptyTag,
    #[error("playback time is unknown or invalid")]
    InvalidTime,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Seek(f64),
    Create(AnnotationDraft),
    Update {
        target: usize,
        id: AnnotationId,
        draft: AnnotationDraft,
    },
    Delete {
        target: usize,
        id: AnnotationId,
    },
    /// A commit was attempted and dropped.
    Rejected(ValidationError),
}

/// The authoring state: mode plus the tag, color and time a commit would use.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Machine {
    mode: Mode,
    tag: String,
    color: String,
    default_color: String,
    observed_time: Option<f64>,
}

impl Machine {
    pub fn new(default_color: impl Into<String>) -> Self {
        let default_color = default_color.into();
        Self {
            mode: Mode::Idle,
            tag: String::new(),
            color: default_color.clone(),
            default_color,
            observed_time: None,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn observed_time(&self) -> Option<f64> {
        self.observed_time
    }

    /// The in-progress session, in either drawing or editing mode.
    pub fn session(&self) -> Option<&DrawSession> {
        match &self.mode {
            Mode::Idle => None,
            Mode::Drawing(session) | Mode::Editing { session, .. } => Some(session),
        }
    }

    /// Index of the record being edited.
    pub fn editing_target(&self) -> Option<usize> {
        match &self.mode {
            Mode::Editing { target, .. } => Some(*target),
            _ => None,
        }
    }

    /// Id of the record being edited.
    pub fn editing_id(&self) -> Option<&AnnotationId> {
        match &self.mode {
            Mode::Editing { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Point the edit at the row its record now occupies.
    pub fn retarget(&mut self, index: usize) {
        if let Mode::Editing { target, .. } = &mut self.mode {
            *target = index;
        }
    }

    /// Apply one input.
    pub fn step(mut self, input: Input, annotations: &[Annotation]) -> (Machine, Option<Effect>) {
        match input {
            Input::PointerDown(at) => {
                self.mode = match self.mode {
                    Mode::Idle | Mode::Drawing(_) => Mode::Drawing(DrawSession::begin(at)),
                    Mode::Editing { target, id, time, .. } => Mode::Editing {
                        session: DrawSession::begin(at),
                        target,
                        id,
                        time,
                    },
                };
                (self, None)
            }
            Input::PointerMove(at) => {
                match &mut self.mode {
                    Mode::Drawing(session) | Mode::Editing { session, .. } if session.active => {
                        session.current = at;
                    }
                    _ => {}
                }
                (self, None)
            }
            Input::PointerUp => {
                if matches!(self.mode, Mode::Drawing(_)) {
                    return self.commit();
                }
                if let Mode::Editing { session, .. } = &mut self.mode {
                    session.active = false;
                }
                (self, None)
            }
            Input::Commit => self.commit(),
            Input::Cancel => {
                if matches!(self.mode, Mode::Editing { .. }) {
                    self.clear_inputs();
                }
                self.mode = Mode::Idle;
                (self, None)
            }
            Input::Delete => match std::mem::take(&mut self.mode) {
                Mode::Editing { target, id, .. } => {
                    self.clear_inputs();
                    (self, Some(Effect::Delete { target, id }))
                }
                other => {
                    self.mode = other;
                    (self, None)
                }
            },
            Input::Select(index) => self.select(index, annotations),
            Input::TimeUpdate(seconds) => {
                if !matches!(self.mode, Mode::Editing { .. }) {
                    self.observed_time = Some(seconds);
                }
                (self, None)
            }
            Input::SetTag(tag) => {
                self.tag = tag;
                (self, None)
            }
            Input::SetColor(color) => {
                self.color = color;
                (self, None)
            }
            Input::Reset => {
                self.mode = Mode::Idle;
                self.observed_time = None;
                self.clear_inputs();
                (self, None)
            }
        }
    }

    fn select(mut self, index: usize, annotations: &[Annotation]) -> (Machine, Option<Effect>) {
        if matches!(self.mode, Mode::Drawing(_)) {
            log::warn!("Ignoring selection while a rectangle is being drawn");
            return (self, None);
        }
        let Some(annotation) = annotations.get(index) else {
            log::warn!("Ignoring selection of missing annotation {}", index);
            return (self, None);
        };
        let Some(id) = annotation.id.clone() else {
            log::warn!("Ignoring selection of unsaved annotation {}", index);
            return (self, None);
        };

        self.tag = annotation.tag.clone();
        self.color = if annotation.color.is_empty() {
            self.default_color.clone()
        } else {
            annotation.color.clone()
        };
        self.mode = Mode::Editing {
            session: DrawSession::covering(annotation.rect()),
            target: index,
            id,
            time: annotation.time,
        };
        (self, Some(Effect::Seek(annotation.time)))
    }

    /// Finish the current session. Whatever happens, the machine ends idle
    /// with cleared inputs.
    fn commit(mut self) -> (Machine, Option<Effect>) {
        let mode = std::mem::take(&mut self.mode);
        let result = self.build_draft(&mode);
        self.clear_inputs();

        let effect = match (result, mode) {
            (Err(reason), _) => {
                log::warn!("Dropping commit: {}", reason);
                Effect::Rejected(reason)
            }
            (Ok(draft), Mode::Editing { target, id, .. }) => Effect::Update { target, id, draft },
            (Ok(draft), _) => Effect::Create(draft),
        };
        (self, Some(effect))
    }

    fn build_draft(&self, mode: &Mode) -> Result<AnnotationDraft, ValidationError> {
        let (session, time) = match mode {
            Mode::Idle => return Err(ValidationError::NoSession),
            Mode::Drawing(session) => (session, self.observed_time),
            Mode::Editing { session, time, .. } => (session, Some(*time)),
        };
        if self.tag.is_empty() {
            return Err(ValidationError::EmptyTag);
        }
        let time = time
            .filter(|t| is_valid_time(*t))
            .ok_or(ValidationError::InvalidTime)?;

        let rect = session.rect();
        Ok(AnnotationDraft {
            tag: self.tag.clone(),
            time,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            color: self.color.clone(),
        })
    }

    fn clear_inputs(&mut self) {
        self.tag.clear();
        self.color = self.default_color.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::VideoId;

    fn run(machine: Machine, inputs: Vec<Input>) -> (Machine, Vec<Effect>) {
        inputs.into_iter().fold((machine, Vec::new()), |(m, mut effects), input| {
            let (next, effect) = m.step(input, &[]);
            effects.extend(effect);
            (next, effects)
        })
    }

    fn stored(id: &str, tag: &str, color: &str, time: f64, rect: Rect) -> Annotation {
        Annotation {
            id: Some(AnnotationId::new(id)),
            video_id: VideoId::new("v1"),
            tag: tag.to_string(),
            time,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            color: color.to_string(),
        }
    }

    #[test]
    fn test_scenario_draw_and_commit() {
        let (machine, effects) = run(
            Machine::new("red"),
            vec![
                Input::SetTag("Car".to_string()),
                Input::TimeUpdate(3.0),
                Input::PointerDown(Point::new(10.0, 10.0)),
                Input::PointerMove(Point::new(30.0, 20.0)),
                Input::PointerMove(Point::new(50.0, 40.0)),
                // Time is captured at commit, not at draw start
                Input::TimeUpdate(12.0),
                Input::PointerUp,
            ],
        );

        assert_eq!(
            effects,
            vec![Effect::Create(AnnotationDraft {
                tag: "Car".to_string(),
                time: 12.0,
                x: 10.0,
                y: 10.0,
                width: 40.0,
                height: 30.0,
                color: "red".to_string(),
            })]
        );
        assert_eq!(machine.mode(), &Mode::Idle);
        assert_eq!(machine.tag(), "");
        assert_eq!(machine.color(), "red");
    }

    #[test]
    fn test_move_replaces_extent_with_sign() {
        let machine = Machine::new("red");
        let (machine, _) = run(
            machine,
            vec![
                Input::PointerDown(Point::new(100.0, 80.0)),
                Input::PointerMove(Point::new(140.0, 90.0)),
                Input::PointerMove(Point::new(60.0, 20.0)),
            ],
        );
        let rect = machine.session().unwrap().rect();
        assert_eq!(rect, Rect::new(100.0, 80.0, -40.0, -60.0));
    }

    #[test]
    fn test_move_without_pointer_down_is_ignored() {
        let (machine, effects) = run(
            Machine::new("red"),
            vec![Input::PointerMove(Point::new(5.0, 5.0)), Input::PointerUp],
        );
        assert_eq!(machine.mode(), &Mode::Idle);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_commit_without_tag_is_dropped_and_resets() {
        let (machine, effects) = run(
            Machine::new("red"),
            vec![
                Input::SetColor("blue".to_string()),
                Input::TimeUpdate(4.0),
                Input::PointerDown(Point::new(1.0, 1.0)),
                Input::PointerMove(Point::new(9.0, 9.0)),
                Input::PointerUp,
            ],
        );
        assert_eq!(effects, vec![Effect::Rejected(ValidationError::EmptyTag)]);
        assert_eq!(machine.mode(), &Mode::Idle);
        assert_eq!(machine.color(), "red");
    }

    #[test]
    fn test_commit_without_time_is_dropped() {
        let (machine, effects) = run(
            Machine::new("red"),
            vec![
                Input::SetTag("Tree".to_string()),
                Input::PointerDown(Point::new(1.0, 1.0)),
                Input::Commit,
            ],
        );
        assert_eq!(effects, vec![Effect::Rejected(ValidationError::InvalidTime)]);
        assert_eq!(machine.mode(), &Mode::Idle);
        assert_eq!(machine.tag(), "");
    }

    #[test]
    fn test_commit_with_invalid_time_is_dropped() {
        for bad in [f64::NAN, -1.0, f64::INFINITY] {
            let (_, effects) = run(
                Machine::new("red"),
                vec![
                    Input::SetTag("Tree".to_string()),
                    Input::TimeUpdate(bad),
                    Input::PointerDown(Point::new(1.0, 1.0)),
                    Input::PointerUp,
                ],
            );
            assert_eq!(effects, vec![Effect::Rejected(ValidationError::InvalidTime)]);
        }
    }

    #[test]
    fn test_commit_from_idle_has_no_session() {
        let (machine, effects) = run(
            Machine::new("red"),
            vec![Input::SetTag("Car".to_string()), Input::Commit],
        );
        assert_eq!(effects, vec![Effect::Rejected(ValidationError::NoSession)]);
        assert_eq!(machine.tag(), "");
    }

    #[test]
    fn test_cancel_drawing_keeps_selection() {
        let (machine, effects) = run(
            Machine::new("red"),
            vec![
                Input::SetTag("Car".to_string()),
                Input::SetColor("green".to_string()),
                Input::PointerDown(Point::new(1.0, 1.0)),
                Input::Cancel,
            ],
        );
        assert!(effects.is_empty());
        assert_eq!(machine.mode(), &Mode::Idle);
        assert_eq!(machine.tag(), "Car");
        assert_eq!(machine.color(), "green");
    }

    #[test]
    fn test_select_seeds_session_and_seeks() {
        let annotations = vec![
            stored("1", "Car", "red", 2.0, Rect::new(0.0, 0.0, 5.0, 5.0)),
            stored("2", "Tree", "green", 42.5, Rect::new(20.0, 30.0, -10.0, 15.0)),
        ];
        let machine = Machine::new("red");
        let (machine, effect) = machine.step(Input::Select(1), &annotations);

        assert_eq!(effect, Some(Effect::Seek(42.5)));
        assert_eq!(machine.editing_target(), Some(1));
        assert_eq!(machine.editing_id(), Some(&AnnotationId::new("2")));
        assert_eq!(machine.tag(), "Tree");
        assert_eq!(machine.color(), "green");
        assert_eq!(
            machine.session().unwrap().rect(),
            Rect::new(20.0, 30.0, -10.0, 15.0)
        );
    }

    #[test]
    fn test_edit_redrag_and_commit_updates() {
        let annotations = vec![stored("7", "Car", "red", 8.0, Rect::new(0.0, 0.0, 5.0, 5.0))];
        let steps = vec![
            Input::Select(0),
            // Playback keeps moving, but the edit stays bound to 8.0
            Input::TimeUpdate(30.0),
            Input::SetColor("blue".to_string()),
            Input::PointerDown(Point::new(10.0, 10.0)),
            Input::PointerMove(Point::new(20.0, 25.0)),
            Input::PointerUp,
        ];
        let mut machine = Machine::new("red");
        let mut effects = Vec::new();
        for input in steps {
            let (next, effect) = machine.step(input, &annotations);
            machine = next;
            effects.extend(effect);
        }
        assert_eq!(effects, vec![Effect::Seek(8.0)]);
        assert_eq!(machine.editing_target(), Some(0));
        assert!(!machine.session().unwrap().active);

        let (machine, effect) = machine.step(Input::Commit, &annotations);
        assert_eq!(
            effect,
            Some(Effect::Update {
                target: 0,
                id: AnnotationId::new("7"),
                draft: AnnotationDraft {
                    tag: "Car".to_string(),
                    time: 8.0,
                    x: 10.0,
                    y: 10.0,
                    width: 10.0,
                    height: 15.0,
                    color: "blue".to_string(),
                },
            })
        );
        assert_eq!(machine.mode(), &Mode::Idle);
        assert_eq!(machine.color(), "red");
    }

    #[test]
    fn test_delete_from_editing() {
        let annotations = vec![stored("7", "Car", "red", 8.0, Rect::new(0.0, 0.0, 5.0, 5.0))];
        let (machine, _) = Machine::new("red").step(Input::Select(0), &annotations);
        let (machine, effect) = machine.step(Input::Delete, &annotations);

        assert_eq!(
            effect,
            Some(Effect::Delete {
                target: 0,
                id: AnnotationId::new("7"),
            })
        );
        assert_eq!(machine.mode(), &Mode::Idle);
        assert_eq!(machine.tag(), "");

        // Nothing to delete outside editing
        let (machine, effect) = machine.step(Input::Delete, &annotations);
        assert_eq!(effect, None);
        assert_eq!(machine.mode(), &Mode::Idle);
    }

    #[test]
    fn test_select_is_exclusive_and_ignored_while_drawing() {
        let annotations = vec![
            stored("1", "Car", "red", 1.0, Rect::new(0.0, 0.0, 5.0, 5.0)),
            stored("2", "Tree", "blue", 2.0, Rect::new(0.0, 0.0, 5.0, 5.0)),
        ];
        let (machine, _) = Machine::new("red").step(Input::Select(0), &annotations);
        let (machine, _) = machine.step(Input::Select(1), &annotations);
        assert_eq!(machine.editing_target(), Some(1));
        assert_eq!(machine.tag(), "Tree");

        let (machine, _) = machine.step(Input::Cancel, &annotations);
        let (machine, _) = machine.step(Input::PointerDown(Point::new(0.0, 0.0)), &annotations);
        let (machine, effect) = machine.step(Input::Select(0), &annotations);
        assert_eq!(effect, None);
        assert!(matches!(machine.mode(), Mode::Drawing(_)));
    }

    #[test]
    fn test_retarget_only_moves_an_edit() {
        let annotations = vec![
            stored("1", "Car", "red", 1.0, Rect::new(0.0, 0.0, 5.0, 5.0)),
            stored("2", "Tree", "blue", 2.0, Rect::new(0.0, 0.0, 5.0, 5.0)),
        ];
        let (mut machine, _) = Machine::new("red").step(Input::Select(1), &annotations);
        machine.retarget(0);
        assert_eq!(machine.editing_target(), Some(0));
        assert_eq!(machine.editing_id(), Some(&AnnotationId::new("2")));

        let mut idle = Machine::new("red");
        idle.retarget(3);
        assert_eq!(idle.mode(), &Mode::Idle);
    }

    #[test]
    fn test_select_out_of_range_or_unsaved_is_ignored() {
        let mut unsaved = stored("x", "Car", "red", 1.0, Rect::default());
        unsaved.id = None;
        let annotations = vec![unsaved];

        let (machine, effect) = Machine::new("red").step(Input::Select(3), &annotations);
        assert_eq!(effect, None);
        let (machine, effect) = machine.step(Input::Select(0), &annotations);
        assert_eq!(effect, None);
        assert_eq!(machine.mode(), &Mode::Idle);
    }

    #[test]
    fn test_reset_clears_everything() {
        let annotations = vec![stored("1", "Car", "blue", 1.0, Rect::default())];
        let (machine, _) = Machine::new("red").step(Input::TimeUpdate(5.0), &annotations);
        let (machine, _) = machine.step(Input::Select(0), &annotations);
        let (machine, _) = machine.step(Input::Reset, &annotations);

        assert_eq!(machine.mode(), &Mode::Idle);
        assert_eq!(machine.tag(), "");
        assert_eq!(machine.color(), "red");
        assert_eq!(machine.observed_time(), None);
    }
}
