/// Euclidean rhythm generation using the Bjorklund algorithm
///
/// Distributes `pulse` onsets as evenly as possible across `step` steps,
/// then rotates the result left by `rotation` steps.
///
/// # Examples
/// ```
/// use drumbeat_core::euclid::bjorklund;
///
/// let tresillo = bjorklund(3, 8, 0);
/// assert_eq!(tresillo, vec![true, false, false, true, false, false, true, false]);
/// ```
pub fn bjorklund(pulse: usize, step: usize, rotation: usize) -> Vec<bool> {
    if step == 0 {
        return Vec::new();
    }
    if pulse == 0 {
        return vec![false; step];
    }
    if pulse >= step {
        return vec![true; step];
    }

    // Start with one group per step, onsets first
    let mut groups: Vec<Vec<bool>> = (0..step).map(|i| vec![i < pulse]).collect();
    let mut heads = pulse;

    loop {
        let tails = groups.len() - heads;
        if tails <= 1 {
            break;
        }
        let pairs = heads.min(tails);

        let mut next = Vec::with_capacity(groups.len() - pairs);
        for i in 0..pairs {
            let mut combined = groups[i].clone();
            combined.extend_from_slice(&groups[heads + i]);
            next.push(combined);
        }
        // Unpaired heads or tails become the new remainder
        next.extend(groups.iter().take(heads).skip(pairs).cloned());
        next.extend(groups.iter().skip(heads + pairs).cloned());

        groups = next;
        heads = pairs;
    }

    let mut result: Vec<bool> = groups.into_iter().flatten().collect();
    if rotation > 0 {
        let rot = rotation % result.len();
        result.rotate_left(rot);
    }
    result
}

/// Renders hits as step notation, `x` for an onset and `.` for a rest
pub fn to_notation(hits: &[bool]) -> String {
    hits.iter().map(|&on| if on { 'x' } else { '.' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bjorklund_empty() {
        assert_eq!(bjorklund(0, 8, 0), vec![false; 8]);
        assert_eq!(bjorklund(0, 0, 0), Vec::<bool>::new());
    }

    #[test]
    fn test_bjorklund_full() {
        assert_eq!(bjorklund(8, 8, 0), vec![true; 8]);
        assert_eq!(bjorklund(10, 8, 0), vec![true; 8]);
    }

    #[test]
    fn test_bjorklund_known_rhythms() {
        assert_eq!(to_notation(&bjorklund(3, 8, 0)), "x..x..x.");
        assert_eq!(to_notation(&bjorklund(5, 8, 0)), "x.xx.xx.");
        assert_eq!(to_notation(&bjorklund(4, 16, 0)), "x...x...x...x...");
    }

    #[test]
    fn test_bjorklund_counts() {
        for step in 1..32 {
            for pulse in 0..=step {
                let pattern = bjorklund(pulse, step, 0);
                assert_eq!(pattern.len(), step);
                assert_eq!(pattern.iter().filter(|&&x| x).count(), pulse);
            }
        }
    }

    #[test]
    fn test_bjorklund_rotation() {
        assert_eq!(to_notation(&bjorklund(3, 8, 1)), "..x..x.x");
        assert_eq!(bjorklund(3, 8, 8), bjorklund(3, 8, 0));
    }
}
