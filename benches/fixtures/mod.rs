// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use plantscribe::{BuildError, Diagram};

pub mod activity {
    use plantscribe::build::activity::{IfSpec, WhileSpec};
    use plantscribe::build::ActivityBody;
    use plantscribe::ActivityDiagram;

    use super::{BuildError, Diagram};

    #[derive(Debug, Clone, Copy)]
    pub enum Case {
        Small,
        LongFlat,
        NestedDeep,
    }

    impl Case {
        /// Rough count of builder calls the case issues.
        pub fn calls(self) -> u64 {
            match self {
                Self::Small => 7,
                Self::LongFlat => 2_000 + 2_000 / 10 * 4,
                Self::NestedDeep => 64 * 3 + 1,
            }
        }
    }

    pub fn build(case: Case) -> Result<Diagram, BuildError> {
        let mut diagram = ActivityDiagram::new();
        let mut body = diagram.body();
        match case {
            Case::Small => {
                body.start()?;
                for idx in 0..5 {
                    body.action(format!("step {idx}"))?;
                }
                body.stop()?;
            }
            Case::LongFlat => {
                for idx in 0..2_000 {
                    body.action(format!("**task** {idx} // with markup"))?;
                    if idx % 10 == 9 {
                        let spec = IfSpec::new(format!("check {idx}?")).with_label("yes");
                        body.if_(spec, |decision| {
                            decision.else_(Some("no"))?;
                            decision.action("retry")
                        })?;
                    }
                }
            }
            Case::NestedDeep => {
                body.while_(WhileSpec::new("running?"), |lp| nest(lp, 63))?;
            }
        }
        diagram.finish()
    }

    fn nest(body: &mut ActivityBody<'_>, depth: usize) -> Result<(), BuildError> {
        if depth == 0 {
            return body.break_();
        }
        body.if_(IfSpec::new(format!("level {depth}?")), |decision| {
            decision.action("descend")?;
            nest(decision, depth - 1)
        })
    }

    pub fn fixture(case: Case) -> Diagram {
        build(case).expect("activity fixture")
    }
}

pub mod sequence {
    use plantscribe::build::sequence::{GroupSpec, MessageSpec, ParticipantSpec};
    use plantscribe::model::{Activation, SequenceBlockKind};
    use plantscribe::SequenceDiagram;

    use super::{BuildError, Diagram};

    #[derive(Debug, Clone, Copy)]
    pub struct Params {
        pub participants: usize,
        pub messages: usize,
        pub group_every: usize,
    }

    impl Params {
        pub const fn new(participants: usize, messages: usize, group_every: usize) -> Self {
            Self { participants, messages, group_every }
        }
    }

    pub fn build(params: Params) -> Result<Diagram, BuildError> {
        let mut diagram = SequenceDiagram::new();
        let mut body = diagram.body();
        let mut aliases = Vec::with_capacity(params.participants);
        for idx in 0..params.participants {
            aliases.push(body.participant(ParticipantSpec::new(format!("Service {idx}")))?);
        }

        let mut sent = 0;
        while sent < params.messages {
            let batch = params.group_every.min(params.messages - sent);
            let spec = GroupSpec::labeled(SequenceBlockKind::Loop, format!("batch {sent}"));
            body.group(spec, |group| {
                for offset in 0..batch {
                    let idx = sent + offset;
                    let from = &aliases[idx % aliases.len()];
                    let to = &aliases[(idx * 7 + 1) % aliases.len()];
                    let spec = MessageSpec::new(from, to).with_text(format!("request {idx}"));
                    let spec = if idx % 5 == 0 {
                        spec.with_activation(Activation::ActivateTarget)
                    } else {
                        spec
                    };
                    group.message_with(spec)?;
                }
                Ok(())
            })?;
            sent += batch;
        }
        diagram.finish()
    }

    pub fn fixture(params: Params) -> Diagram {
        build(params).expect("sequence fixture")
    }
}
