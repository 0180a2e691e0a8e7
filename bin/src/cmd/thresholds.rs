//! Thresholds command implementation.

use anyhow::Result;
use ronda::AssetClass;
use ronda::events::Thresholds;

/// Print the classification cut-offs for one or every asset class.
pub(crate) fn show_thresholds(asset_class: Option<AssetClass>) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Classification Thresholds                   ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let classes = asset_class.map_or_else(
        || vec![AssetClass::SmallCap, AssetClass::MidCap, AssetClass::LargeCap],
        |class| vec![class],
    );

    for class in classes {
        let t = Thresholds::for_asset_class(class);
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!(
            "{} CAP (price scale {:.2})",
            class.as_str().to_uppercase(),
            Thresholds::price_scale(class)
        );
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

        println!("Leakage");
        println!("  High drift:           {:>6.2}%", t.leakage.high_drift_pct);
        println!("  High volume ratio:    {:>6.2}x", t.leakage.high_volume_ratio);
        println!("  Tight drift:          {:>6.2}%", t.leakage.tight_drift_pct);
        println!("  Tight volume ratio:   {:>6.2}x", t.leakage.tight_volume_ratio);
        println!("Conviction");
        println!("  Institutional move:   {:>6.2}%", t.conviction.institutional_move_pct);
        println!("  Institutional volume: {:>6.2}x", t.conviction.institutional_volume_ratio);
        println!("  Hype move:            {:>6.2}%", t.conviction.hype_move_pct);
        println!("  Hype volume:          {:>6.2}x", t.conviction.hype_volume_ratio);
        println!("  Quiet move:           {:>6.2}%", t.conviction.quiet_move_pct);
        println!("  Quiet volume:         {:>6.2}x", t.conviction.quiet_volume_ratio);
        println!("Retention");
        println!("  Materiality:          {:>6.2}%", t.retention.materiality_pct);
        println!("  Hold fraction:        {:>6.2}", t.retention.hold_fraction);
        println!();
    }

    Ok(())
}
