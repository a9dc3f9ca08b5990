//! Simultaneous move resolution: border blocking, head contact, trail cuts
//!
//! Every living player's step is proposed first from the state at the start
//! of the tick, then steps are resolved one player at a time in ascending id
//! order. Head contact rules:
//!
//! - entering a tile where another head sits still: the mover dies
//! - two heads entering the same tile, or swapping tiles: the lower id wins
//!
//! Entering a tile of another living player's trail kills that player.

use serde::{Deserialize, Serialize};

use crate::board::{Board, CaptureReport};
use crate::hex::{Direction, Hex};
use crate::player::{Player, PlayerId, Step};

/// What happened to a single mover
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Dead before or during the tick
    Inactive,
    /// Still between tiles
    Stayed,
    /// Refused at the border
    Blocked,
    /// Moved onto a new tile
    Entered(Hex),
    /// Lost a head contact
    Died,
}

/// Something worth reporting from a tick
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickEvent {
    Claimed { player: PlayerId, tile: Hex },
    Captured { player: PlayerId, trail: usize, enclosed: usize },
    Killed { victim: PlayerId, killer: Option<PlayerId> },
    Blocked { player: PlayerId, tile: Hex },
}

impl TickEvent {
    pub fn captured(player: PlayerId, report: &CaptureReport) -> Self {
        TickEvent::Captured {
            player,
            trail: report.trail,
            enclosed: report.enclosed,
        }
    }
}

/// Proposed steps for one tick, indexed by player id
#[derive(Clone, Debug)]
pub struct Proposals {
    steps: Vec<Option<Step>>,
    origins: Vec<Hex>,
}

impl Proposals {
    pub fn step(&self, player: PlayerId) -> Option<Step> {
        self.steps.get(player).copied().flatten()
    }

    pub fn origin(&self, player: PlayerId) -> Hex {
        self.origins[player]
    }

    /// Tile the player is heading into this tick, ignoring the border
    fn target(&self, player: PlayerId) -> Option<Hex> {
        self.step(player).and_then(|s| s.enters)
    }
}

/// Stateless resolver over a board and its players
#[derive(Clone, Copy, Debug, Default)]
pub struct CollisionResolver;

impl CollisionResolver {
    /// Compute every living player's step without mutating anything
    pub fn propose(players: &[Player], directions: &[Direction], velocity: f32) -> Proposals {
        let steps = players
            .iter()
            .zip(directions)
            .map(|(p, &dir)| p.is_alive().then(|| p.propose_step(dir, velocity)))
            .collect();
        let origins = players.iter().map(Player::head).collect();

        Proposals { steps, origins }
    }

    /// Resolve the move of `mover`, killing whoever loses a contact.
    /// Kill events are appended to `events`.
    pub fn resolve_move(
        board: &mut Board,
        players: &mut [Player],
        proposals: &Proposals,
        mover: PlayerId,
        events: &mut Vec<TickEvent>,
    ) -> Outcome {
        if players[mover].is_dead() {
            return Outcome::Inactive;
        }
        let Some(step) = proposals.step(mover) else {
            return Outcome::Inactive;
        };

        let target = match step.enters {
            None => {
                players[mover].commit(step);
                return Outcome::Stayed;
            }
            Some(t) if board.is_border(t) => {
                players[mover].block(step.heading);
                events.push(TickEvent::Blocked {
                    player: mover,
                    tile: players[mover].head(),
                });
                tracing::debug!(player = mover, "blocked at border");
                return Outcome::Blocked;
            }
            Some(t) => t,
        };

        if let Some(other) = Self::head_contact(board, players, proposals, mover, target) {
            let (loser, winner) = Self::contact_loser(proposals, mover, other);
            kill_player(board, players, loser, Some(winner), events);
            if loser == mover {
                return Outcome::Died;
            }
        }

        players[mover].commit(step);

        if let Some(owner) = board.claimant(target) {
            if owner != mover && players[owner].is_alive() {
                kill_player(board, players, owner, Some(mover), events);
            }
        }

        Outcome::Entered(target)
    }

    /// Lowest-id living player whose head holds `target` against the mover.
    /// A head that has not been resolved yet and is leaving for another
    /// tile is not a contact; the mover may still cut its trail.
    fn head_contact(
        board: &Board,
        players: &[Player],
        proposals: &Proposals,
        mover: PlayerId,
        target: Hex,
    ) -> Option<PlayerId> {
        players
            .iter()
            .filter(|q| q.id() != mover && q.is_alive() && q.head() == target)
            .map(Player::id)
            .find(|&q| {
                if q < mover {
                    return true;
                }
                match proposals.target(q).filter(|&t| board.is_playable(t)) {
                    None => true,
                    Some(t) => t == proposals.origin(mover),
                }
            })
    }

    /// Decide a head contact between `mover` and `other`. Returns
    /// (loser, winner).
    fn contact_loser(proposals: &Proposals, mover: PlayerId, other: PlayerId) -> (PlayerId, PlayerId) {
        if other < mover {
            // other already holds the tile: it either sat there or entered
            // it first this tick, and the lower id wins ties
            return (mover, other);
        }

        let swapping = proposals.target(other) == Some(proposals.origin(mover));
        if swapping {
            (other, mover)
        } else {
            (mover, other)
        }
    }

    /// Steps to the border along each axis, capped at the map radius
    pub fn distances(board: &Board, player: &Player) -> [u32; 6] {
        let mut result = [0; 6];
        for dir in Direction::ALL {
            result[dir.index()] = board
                .steps_to_border(player.head(), dir)
                .min(board.radius());
        }
        result
    }
}

/// Kill `victim`, releasing its trail, and credit `killer`
pub fn kill_player(
    board: &mut Board,
    players: &mut [Player],
    victim: PlayerId,
    killer: Option<PlayerId>,
    events: &mut Vec<TickEvent>,
) {
    let trail = players[victim].kill();
    board.release(&trail);
    if let Some(k) = killer {
        players[k].add_kill();
    }
    tracing::debug!(victim, ?killer, released = trail.len(), "player killed");
    events.push(TickEvent::Killed { victim, killer });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::CENTER;

    fn dir(i: usize) -> Direction {
        Direction::from_index(i).unwrap()
    }

    fn setup(radius: u32, heads: &[Hex]) -> (Board, Vec<Player>) {
        let board = Board::new(radius);
        let players = heads
            .iter()
            .enumerate()
            .map(|(id, &h)| {
                let mut p = Player::new(id);
                p.spawn(h);
                p
            })
            .collect();
        (board, players)
    }

    fn resolve_all(
        board: &mut Board,
        players: &mut [Player],
        directions: &[Direction],
        velocity: f32,
    ) -> (Vec<Outcome>, Vec<TickEvent>) {
        let proposals = CollisionResolver::propose(players, directions, velocity);
        let mut events = Vec::new();
        let outcomes = (0..players.len())
            .map(|id| CollisionResolver::resolve_move(board, players, &proposals, id, &mut events))
            .collect();
        (outcomes, events)
    }

    #[test]
    fn test_propose_is_read_only() {
        let (_, players) = setup(5, &[CENTER]);
        let proposals = CollisionResolver::propose(&players, &[dir(0)], 1.0);
        assert_eq!(proposals.step(0).unwrap().enters, Some(Hex::new(1, 0)));
        assert_eq!(proposals.origin(0), CENTER);
        assert_eq!(players[0].head(), CENTER);
    }

    #[test]
    fn test_dead_players_are_inactive() {
        let (mut board, mut players) = setup(5, &[CENTER, Hex::new(2, 0)]);
        players[1].kill();
        let (outcomes, events) = resolve_all(&mut board, &mut players, &[dir(0), dir(0)], 1.0);
        assert_eq!(outcomes, vec![Outcome::Entered(Hex::new(1, 0)), Outcome::Inactive]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_partial_progress_stays() {
        let (mut board, mut players) = setup(5, &[CENTER]);
        let (outcomes, _) = resolve_all(&mut board, &mut players, &[dir(2)], 0.5);
        assert_eq!(outcomes, vec![Outcome::Stayed]);
        assert_eq!(players[0].heading(), dir(2));
    }

    #[test]
    fn test_border_blocks() {
        let (mut board, mut players) = setup(3, &[Hex::new(0, 2)]);
        let (outcomes, events) = resolve_all(&mut board, &mut players, &[dir(5)], 1.0);
        assert_eq!(outcomes, vec![Outcome::Blocked]);
        assert!(players[0].is_alive());
        assert_eq!(players[0].progress(), 0.0);
        assert_eq!(
            events,
            vec![TickEvent::Blocked { player: 0, tile: Hex::new(0, 2) }]
        );
    }

    #[test]
    fn test_leaving_head_is_not_a_contact() {
        // 0 follows 1 east; 1 moves on in the same tick
        let (mut board, mut players) = setup(6, &[CENTER, Hex::new(1, 0)]);
        let (outcomes, events) = resolve_all(&mut board, &mut players, &[dir(0), dir(0)], 1.0);
        assert_eq!(
            outcomes,
            vec![Outcome::Entered(Hex::new(1, 0)), Outcome::Entered(Hex::new(2, 0))]
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_higher_id_entering_lower_id_head_dies() {
        // 1 steps onto the tile 0 just reached; 0 got there first
        let (mut board, mut players) = setup(6, &[Hex::new(-1, 0), Hex::new(0, 1)]);
        let (outcomes, events) = resolve_all(&mut board, &mut players, &[dir(0), dir(2)], 1.0);
        assert_eq!(outcomes, vec![Outcome::Entered(CENTER), Outcome::Died]);
        assert_eq!(events, vec![TickEvent::Killed { victim: 1, killer: Some(0) }]);
        assert_eq!(players[0].counters().kills, 1);
    }

    #[test]
    fn test_trail_cut() {
        let (mut board, mut players) = setup(6, &[CENTER, Hex::new(0, 2)]);
        assert!(board.claim(Hex::new(0, 1), &mut players[0]).unwrap());

        let (outcomes, events) = resolve_all(&mut board, &mut players, &[dir(3), dir(2)], 1.0);
        assert_eq!(outcomes[1], Outcome::Entered(Hex::new(0, 1)));
        assert!(players[0].is_dead());
        assert_eq!(board.claimant(Hex::new(0, 1)), None);
        assert_eq!(events, vec![TickEvent::Killed { victim: 0, killer: Some(1) }]);
    }

    #[test]
    fn test_distances_capped() {
        let (board, players) = setup(4, &[Hex::new(3, 0)]);
        let d = CollisionResolver::distances(&board, &players[0]);
        assert_eq!(d[0], 1);
        assert_eq!(d[3], 4);
        assert!(d.iter().all(|&v| (1..=4).contains(&v)));
    }
}
