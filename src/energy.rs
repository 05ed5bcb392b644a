/// Kinetic-energy math and the energy-to-color gradient used to paint disks.
use eframe::egui::Color32;
use rapier2d::na::Vector2;

/// Rigid-body kinetic energy: `0.5·m·|v|² + 0.5·I·ω²`.
pub fn kinetic_energy(mass: f32, moment: f32, velocity: &Vector2<f32>, angular_velocity: f32) -> f32 {
    0.5 * mass * velocity.norm_squared() + 0.5 * moment * angular_velocity * angular_velocity
}

/// Arithmetic mean of an energy sample, 0 when the sample is empty.
pub fn average_energy(energies: &[f32]) -> f32 {
    if energies.is_empty() {
        return 0.0;
    }
    energies.iter().sum::<f32>() / energies.len() as f32
}

/// Maps a kinetic energy to a blue→white→red gradient relative to the average.
///
/// Below the average the color interpolates from blue (cold) up to white at
/// exactly the average; above it, from white toward red, fully red at twice
/// the average. The above-average scale factor is `2 − energy/average`
/// (equivalent to `1 − (energy − average)/average` before clamping). A
/// non-positive average yields neutral white instead of dividing by zero.
pub fn energy_color(energy: f32, average: f32) -> Color32 {
    if average <= 0.0 {
        return Color32::WHITE;
    }
    let normalized = energy / average;
    if normalized < 1.0 {
        let c = channel(normalized);
        Color32::from_rgb(c, c, 255)
    } else {
        let c = channel(2.0 - normalized);
        Color32::from_rgb(255, c, c)
    }
}

fn channel(scale: f32) -> u8 {
    (255.0 * scale).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_at_average_is_white() {
        assert_eq!(energy_color(50.0, 50.0), Color32::from_rgb(255, 255, 255));
    }

    #[test]
    fn zero_energy_is_blue() {
        assert_eq!(energy_color(0.0, 50.0), Color32::from_rgb(0, 0, 255));
    }

    #[test]
    fn twice_average_and_beyond_is_red() {
        assert_eq!(energy_color(100.0, 50.0), Color32::from_rgb(255, 0, 0));
        assert_eq!(energy_color(1.0e9, 50.0), Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn zero_average_is_neutral_white() {
        assert_eq!(energy_color(123.0, 0.0), Color32::WHITE);
        assert_eq!(energy_color(0.0, 0.0), Color32::WHITE);
    }

    #[test]
    fn channels_stay_in_range_across_sweep() {
        // Color32 channels are u8 by construction; the real risk is the cast
        // from a scale outside [0, 1]. Sweep a wide ratio range and make sure
        // the gradient stays monotone at the endpoints.
        for i in 0..=400 {
            let energy = i as f32 * 0.25; // 0 .. 100, average 25
            let c = energy_color(energy, 25.0);
            if energy < 25.0 {
                assert_eq!(c.b(), 255);
                assert_eq!(c.r(), c.g());
            } else {
                assert_eq!(c.r(), 255);
                assert_eq!(c.g(), c.b());
            }
        }
    }

    #[test]
    fn kinetic_energy_of_rest_is_zero() {
        assert_eq!(kinetic_energy(10.0, 5.0, &Vector2::zeros(), 0.0), 0.0);
    }

    #[test]
    fn kinetic_energy_is_nonnegative_and_additive() {
        let translational = kinetic_energy(2.0, 3.0, &Vector2::new(3.0, 4.0), 0.0);
        assert!((translational - 25.0).abs() < 1e-6); // 0.5 * 2 * 25

        let rotational = kinetic_energy(2.0, 3.0, &Vector2::zeros(), 2.0);
        assert!((rotational - 6.0).abs() < 1e-6); // 0.5 * 3 * 4

        let both = kinetic_energy(2.0, 3.0, &Vector2::new(3.0, 4.0), 2.0);
        assert!((both - 31.0).abs() < 1e-6);
        assert!(kinetic_energy(1.0, 1.0, &Vector2::new(-7.0, 0.5), -3.0) >= 0.0);
    }

    #[test]
    fn average_energy_handles_empty_sample() {
        assert_eq!(average_energy(&[]), 0.0);
        assert_eq!(average_energy(&[2.0, 4.0]), 3.0);
    }
}
