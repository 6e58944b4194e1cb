//! Band-specific advice text returned with every prediction.

use super::risk::RiskLevel;

/// Advice for a risk band, personalized with the probability and area
pub fn recommendation(level: RiskLevel, probability: f64, area: &str) -> String {
    let percent = probability * 100.0;
    match level {
        RiskLevel::High => format!(
            "HIGH RISK ({percent:.1}%)

IMMEDIATE ACTIONS REQUIRED:
- Consult a healthcare provider immediately, especially if experiencing fever, headache, or joint pain
- Avoid outdoor activities during peak mosquito hours (dawn & dusk)
- Stay in air-conditioned or well-screened areas
- Eliminate standing water around your home (flower pots, containers, gutters)
- Wear long-sleeved shirts and long pants in light colors

HEALTH RECOMMENDATIONS:
- Stay hydrated with clean, boiled water
- Avoid aspirin or ibuprofen (may increase bleeding risk)

SEEK IMMEDIATE MEDICAL HELP IF:
- High fever develops
- Severe headache or pain behind eyes
- Joint/muscle pain
- Nausea or vomiting

2-4 MONTH OUTLOOK: Historically, {area} shows continued elevated risk during this period. Enhanced vigilance required."
        ),
        RiskLevel::Medium => format!(
            "MEDIUM RISK ({percent:.1}%)

ENHANCED PREVENTION NEEDED:
- Take preventive measures against mosquito bites
- Check and repair window/door screens
- Use mosquito repellent when outdoors
- Clear any standing water weekly

DAILY LIFESTYLE:
- Wear protective clothing during peak mosquito hours
- Use mosquito nets while sleeping
- Stay well-hydrated
- Consult a doctor if symptoms worsen

2-4 MONTH OUTLOOK: {area} shows moderate risk trends. Continue preventive measures."
        ),
        RiskLevel::Low => format!(
            "LOW RISK ({percent:.1}%)

GENERAL PREVENTION:
- Maintain basic mosquito prevention habits
- Regularly check for and eliminate standing water
- Use mosquito repellent during peak hours

HEALTHY HABITS:
- Balanced diet rich in vitamins and minerals
- Adequate sleep (7-8 hours) for strong immunity
- Stay hydrated

2-4 MONTH OUTLOOK: {area} historically shows low risk. Continue routine monitoring."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_risk_text() {
        let text = recommendation(RiskLevel::High, 0.8234, "Mirpur");
        assert!(text.starts_with("HIGH RISK (82.3%)"));
        assert!(text.contains("Historically, Mirpur shows continued elevated risk"));
    }

    #[test]
    fn test_medium_and_low_text() {
        let medium = recommendation(RiskLevel::Medium, 0.5, "Badda");
        assert!(medium.starts_with("MEDIUM RISK (50.0%)"));
        assert!(medium.contains("Badda shows moderate risk trends"));

        let low = recommendation(RiskLevel::Low, 0.05, "Gulshan");
        assert!(low.starts_with("LOW RISK (5.0%)"));
        assert!(low.contains("Gulshan historically shows low risk"));
    }
}
