use serde_json::Value;

use crate::{catalog::Catalog, types::TripRequest};

/// JSON template embedded in the prompt. Three variants with fixed semantic
/// roles so the extractor downstream has a predictable shape to recover.
const OUTPUT_TEMPLATE: &str = r#"{
  "plans": [
    {
      "version": "deep",
      "title": "In-depth experience",
      "description": "8 attractions, relaxed pace, for unhurried exploration",
      "totalAttractions": 8,
      "dailyPlans": [
        {
          "day": 1,
          "date": "2026-05-01",
          "theme": "Theme of the day (e.g. Tiananmen - Palace Museum - Jingshan)",
          "activities": [
            {
              "time": "08:30",
              "name": "Attraction name",
              "attractionId": "attraction id (must come from the candidate data)",
              "type": "attraction",
              "duration": 180,
              "tips": ["fastest entry is the east gate", "don't miss the Treasure Gallery"],
              "aiReason": "why this attraction at this time"
            },
            {
              "time": "12:00",
              "name": "Lunch: local roast duck restaurant",
              "type": "meal",
              "duration": 60,
              "tips": ["5 minutes on foot", "about 120 per person"],
              "aiReason": "close to the morning attraction, regional specialty"
            }
          ],
          "estimatedCost": 200
        }
      ]
    },
    {
      "version": "classic",
      "title": "Classic panorama",
      "description": "12 attractions covering the must-sees, for first-time visitors",
      "totalAttractions": 12,
      "dailyPlans": []
    },
    {
      "version": "niche",
      "title": "Off the beaten path",
      "description": "10 attractions away from the crowds, for a distinctive trip",
      "totalAttractions": 10,
      "dailyPlans": []
    }
  ]
}"#;

/// Build the single-shot planning instruction for the model.
///
/// Pure and deterministic: identical request and catalog always produce an
/// identical prompt. Malformed requests are the orchestrator's problem;
/// this function never fails.
pub fn build_itinerary_prompt(request: &TripRequest, catalog: &Catalog) -> String {
    let interests = if request.interests.is_empty() {
        "no particular preference".to_string()
    } else {
        request.interests.join(", ")
    };

    format!(
        "You are a seasoned travel planner who designs sensible, efficient itineraries.\n\
         \n\
         # Trip requirements\n\
         - Destination: {destination}\n\
         - Duration: {days} days, {nights} nights\n\
         - Pace: {pace}\n\
         - Interests: {interests}\n\
         - Travel party: {travelers}{existing}\n\
         \n\
         # Candidate attraction data\n\
         {catalog}\n\
         \n\
         # Planning principles\n\
         1. **Geographic clustering**: keep each day's attractions within 15km of each other and order them to minimize transit time\n\
         2. **Realistic timing**:\n\
            - Respect opening hours and closure days strictly; never schedule a closed attraction\n\
            - Reserve transit buffers (30 minutes within the city, 1-2 hours for outskirts)\n\
            - Prefer the best visiting window (museums are quieter in the morning, night views peak at dusk)\n\
         3. **Balanced experience**:\n\
            - Alternate intensity (historic sites + park strolls + city viewpoints)\n\
            - Alternate indoor and outdoor stops (avoid a full day in the sun or a full day inside)\n\
            - Plan 1-2 headline attractions per day, the rest supporting stops\n\
         4. **Meals in context**:\n\
            - Schedule meals inside the regular windows (11:30-13:00, 17:30-19:30)\n\
            - Recommend regional restaurants or food streets near the day's route\n\
            - Vary the cuisine across the trip\n\
         5. **Party fit**:\n\
            - With children: avoid long walks, add rest stops, prefer family-friendly attractions\n\
            - With seniors: avoid climbs and rough terrain, prefer gentle routes, allow generous time\n\
            - Couples: add romantic elements such as night views and artsy districts\n\
         \n\
         # Output requirements\n\
         **Important: respond with pure JSON only. Do not add any explanatory text.**\n\
         \n\
         Produce 3 plans with clearly different styles, strictly in this JSON format:\n\
         \n\
         {template}\n\
         \n\
         **Hard rules:**\n\
         1. Return JSON only; do not wrap it in markdown code fences (no ```json)\n\
         2. Every attractionId must come from the candidate attraction data\n\
         3. Respect attraction opening hours strictly\n\
         4. Keep each day's attractions geographically close\n\
         5. The 3 plans must differ noticeably\n\
         6. Every activity must include an aiReason field\n\
         \n\
         Now return the JSON data directly:",
        destination = request.destination,
        days = request.days,
        nights = request.nights(),
        pace = request.pace.description(),
        interests = interests,
        travelers = travelers_text(request),
        existing = existing_attractions_section(request),
        catalog = catalog_json(catalog),
        template = OUTPUT_TEMPLATE,
    )
}

/// Verbalize the traveler composition, leaving zero-valued categories out
fn travelers_text(request: &TripRequest) -> String {
    let travelers = &request.travelers;
    let mut parts = Vec::new();
    if travelers.adults > 0 {
        parts.push(count_noun(travelers.adults, "adult", "adults"));
    }
    if travelers.children > 0 {
        parts.push(count_noun(travelers.children, "child", "children"));
    }
    if travelers.seniors > 0 {
        parts.push(count_noun(travelers.seniors, "senior", "seniors"));
    }

    if parts.is_empty() {
        "unspecified".to_string()
    } else {
        parts.join(", ")
    }
}

fn count_noun(count: u32, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Dedicated section for attractions the user already picked. These take
/// priority over every other candidate.
fn existing_attractions_section(request: &TripRequest) -> String {
    if request.existing_attractions.is_empty() {
        return String::new();
    }

    let listing = request
        .existing_attractions
        .iter()
        .map(|attraction| format!("- {} (ID: {})", attraction.name, attraction.id))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "\n\n# Attractions the user already picked (must be scheduled first)\n\
         {listing}\n\
         \n\
         **Important**:\n\
         - These attractions were chosen by the user and take priority over all other candidates\n\
         - Place each one on a fitting day based on its location and type\n\
         - Every attraction listed here must appear in the final itinerary\n\
         - Round the plan out with further suitable attractions around them"
    )
}

fn catalog_json(catalog: &Catalog) -> String {
    let views: Vec<Value> = catalog
        .attractions()
        .iter()
        .map(|attraction| attraction.prompt_view())
        .collect();

    serde_json::to_string_pretty(&views).unwrap_or_else(|_| "[]".to_string())
}
