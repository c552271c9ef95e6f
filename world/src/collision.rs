use maze_chase_core::Body;
use maze_chase_system_targeting::Pursuer;

/// Outcome of the player touching a pursuer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Contact {
    /// The player captures the pursuer at this index.
    Capture(usize),
    /// The pursuer at this index catches the player.
    Caught(usize),
}

/// Reports whether two bodies are closer than half a tile.
pub(crate) fn overlaps(a: &Body, b: &Body) -> bool {
    a.position().distance(b.position()) < a.tile_length() / 2.0
}

/// Contacts in pursuer order, ending at the first pursuer that catches the
/// player.
pub(crate) fn contacts(player: &Body, pursuers: &[Pursuer], empowered: bool) -> Vec<Contact> {
    let mut found = Vec::new();
    for (index, pursuer) in pursuers.iter().enumerate() {
        if !overlaps(player, pursuer.body()) {
            continue;
        }
        if empowered && pursuer.is_vulnerable() {
            found.push(Contact::Capture(index));
        } else {
            found.push(Contact::Caught(index));
            break;
        }
    }
    found
}
