//! Word-play tools that produce creative cards.
//!
//! These are placeholders: every tool returns the same fixed sample
//! suggestions whatever its input, as long as no input is blank. The
//! interface around them (keys, inputs, the cards they produce) is real.

use crate::card::{
    AcronymCard, AlliterationCard, Card, CardKind, ChainCard, ExplodeCard, FuseCard, PovCard,
    SceneCard, SimileCard, UnexpectCard, UnfoldCard,
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreativeTool {
    Simile,
    Explode,
    Unexpect,
    Chain,
    Pov,
    Alliteration,
    Acronym,
    Fuse,
    Scene,
    Unfold,
}

impl CreativeTool {
    pub const ALL: [CreativeTool; 10] = [
        CreativeTool::Simile,
        CreativeTool::Explode,
        CreativeTool::Unexpect,
        CreativeTool::Chain,
        CreativeTool::Pov,
        CreativeTool::Alliteration,
        CreativeTool::Acronym,
        CreativeTool::Fuse,
        CreativeTool::Scene,
        CreativeTool::Unfold,
    ];

    pub fn key(&self) -> &'static str {
        self.kind().tag()
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|tool| tool.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            CreativeTool::Simile => "Simile",
            CreativeTool::Explode => "Explode",
            CreativeTool::Unexpect => "Unexpect",
            CreativeTool::Chain => "Chain",
            CreativeTool::Pov => "POV",
            CreativeTool::Alliteration => "Alliteration",
            CreativeTool::Acronym => "Acronym",
            CreativeTool::Fuse => "Fuse",
            CreativeTool::Scene => "Scene",
            CreativeTool::Unfold => "Unfold",
        }
    }

    /// Number of text inputs the tool takes (1 or 2).
    pub fn input_count(&self) -> usize {
        match self {
            CreativeTool::Alliteration | CreativeTool::Fuse => 2,
            _ => 1,
        }
    }

    /// Hint text for input `slot` (0-based).
    pub fn placeholder(&self, slot: usize) -> &'static str {
        if slot > 0 {
            return "Second input...";
        }
        match self {
            CreativeTool::Simile => "Enter a word or concept...",
            CreativeTool::Unexpect => "Enter a scene or concept...",
            CreativeTool::Pov => "Enter a topic...",
            CreativeTool::Alliteration => "Topic, Letter",
            CreativeTool::Fuse => "Concept 1, Concept 2",
            CreativeTool::Scene => "Enter a scene or place...",
            CreativeTool::Explode
            | CreativeTool::Chain
            | CreativeTool::Acronym
            | CreativeTool::Unfold => "Enter a word...",
        }
    }

    /// The card type this tool produces.
    pub fn kind(&self) -> CardKind {
        match self {
            CreativeTool::Simile => CardKind::Simile,
            CreativeTool::Explode => CardKind::Explode,
            CreativeTool::Unexpect => CardKind::Unexpect,
            CreativeTool::Chain => CardKind::Chain,
            CreativeTool::Pov => CardKind::Pov,
            CreativeTool::Alliteration => CardKind::Alliteration,
            CreativeTool::Acronym => CardKind::Acronym,
            CreativeTool::Fuse => CardKind::Fuse,
            CreativeTool::Scene => CardKind::Scene,
            CreativeTool::Unfold => CardKind::Unfold,
        }
    }

    fn samples(&self) -> &'static [&'static str] {
        match self {
            CreativeTool::Simile => &[
                "as chaotic as a kicked anthill",
                "like a circuit board with a million flashing lights",
                "as busy as a beehive",
            ],
            CreativeTool::Explode => &["dead eight", "did I cite", "dedicate"],
            CreativeTool::Unexpect => &[
                "a walk in the park where the pigeons are robotic and whisper secrets",
                "a walk in the park with upside-down trees",
                "a walk in the park during a rain of jellybeans",
            ],
            CreativeTool::Chain => {
                &["mountain -> peak -> snow -> cold -> winter -> fireplace -> warmth"]
            }
            CreativeTool::Pov => &[
                "a psychologist's concern",
                "a marketer's opportunity",
                "a teenager's social lifeline",
            ],
            CreativeTool::Alliteration => &["deep", "dark", "damp", "drowning"],
            CreativeTool::Acronym => {
                &["Determinedly Reaching for Extraordinary Aspirations and Meaning"]
            }
            CreativeTool::Fuse => &[
                "a car with a wooden chassis",
                "the rust on a car spreading like rings on a tree trunk",
            ],
            CreativeTool::Scene => &[
                "the scent of old paper and dust",
                "the soft rustle of turning pages",
                "the gentle hum of fluorescent lights",
            ],
            CreativeTool::Unfold => &["a heart on fire", "firing up the engine"],
        }
    }

    /// Run the tool. `None` if any required input is missing or blank.
    pub fn run<S: AsRef<str>>(&self, inputs: &[S]) -> Option<CreativeRun> {
        let inputs: Vec<String> = (0..self.input_count())
            .map(|i| {
                inputs
                    .get(i)
                    .map(|s| s.as_ref().trim().to_string())
                    .unwrap_or_default()
            })
            .collect();
        if inputs.iter().any(String::is_empty) {
            return None;
        }
        Some(CreativeRun {
            tool: *self,
            inputs,
            results: self.samples().iter().map(|s| s.to_string()).collect(),
        })
    }
}

impl fmt::Display for CreativeTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The output of one tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreativeRun {
    pub tool: CreativeTool,
    /// Trimmed inputs, exactly `tool.input_count()` of them.
    pub inputs: Vec<String>,
    pub results: Vec<String>,
}

impl CreativeRun {
    fn input(&self, slot: usize) -> String {
        self.inputs.get(slot).cloned().unwrap_or_default()
    }

    /// The creative card for this run.
    pub fn into_card(self) -> Card {
        let first = self.input(0);
        let results = self.results;
        match self.tool {
            CreativeTool::Simile => Card::Simile(SimileCard {
                word: first,
                similes: results,
                width: None,
            }),
            CreativeTool::Explode => Card::Explode(ExplodeCard {
                word: first,
                fragments: results,
                width: None,
            }),
            CreativeTool::Unexpect => Card::Unexpect(UnexpectCard {
                scene: first,
                twists: results,
                width: None,
            }),
            CreativeTool::Chain => Card::Chain(ChainCard {
                word: first,
                chains: results,
                width: None,
            }),
            CreativeTool::Pov => Card::Pov(PovCard {
                topic: first,
                perspectives: results,
                width: None,
            }),
            CreativeTool::Alliteration => Card::Alliteration(AlliterationCard {
                topic: first,
                letter: self.inputs.get(1).cloned().unwrap_or_default(),
                words: results,
                width: None,
            }),
            CreativeTool::Acronym => Card::Acronym(AcronymCard {
                word: first,
                expansions: results,
                width: None,
            }),
            CreativeTool::Fuse => Card::Fuse(FuseCard {
                first,
                second: self.inputs.get(1).cloned().unwrap_or_default(),
                fusions: results,
                width: None,
            }),
            CreativeTool::Scene => Card::Scene(SceneCard {
                place: first,
                details: results,
                width: None,
            }),
            CreativeTool::Unfold => Card::Unfold(UnfoldCard {
                word: first,
                meanings: results,
                width: None,
            }),
        }
    }
}
