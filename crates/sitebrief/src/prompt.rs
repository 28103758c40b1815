//! Report prompt template

/// Visual divider placed between report sections
pub const SECTION_DIVIDER: &str =
    "═══════════════════════════════════════════════════════════════";

/// Marker the model must use for a section the page says nothing about
pub const NOT_AVAILABLE: &str = "Information not available on this page";

/// Marker for a page without pricing
pub const PRICING_NOT_AVAILABLE: &str = "Pricing information is not available on this page";

/// Report section headings, in report order
pub const SECTION_HEADINGS: [&str; 12] = [
    "WEBSITE NAME",
    "WEBSITE OVERVIEW",
    "TARGET AUDIENCE",
    "KEY FEATURES & SERVICES",
    "PRICING INFORMATION",
    "CONTENT SECTIONS & NAVIGATION",
    "COMPANY INFORMATION",
    "SOCIAL PROOF & CREDIBILITY",
    "CONTACT & SUPPORT",
    "CALLS-TO-ACTION",
    "TECHNICAL & ADDITIONAL DETAILS",
    "OVERALL IMPRESSION",
];

/// What each section should cover, indexed like [`SECTION_HEADINGS`]
const SECTION_GUIDANCE: [&str; 12] = [
    "[Provide the complete, official name of the website/company/service]",
    "[Write a detailed, multi-paragraph description covering:
- What the website is about
- The main purpose and mission
- Core value proposition
- What makes it unique or different
- Brief history or background if mentioned
- Overall positioning in the market]",
    "[Provide detailed information about who this website is for:
- Primary target demographics
- Secondary audiences
- User personas or customer types
- Industries or sectors served
- Geographic targeting if mentioned
- Skill level or expertise expected]",
    "[List and describe in detail ALL features, services, products, or offerings:
- Main features with full descriptions
- Secondary features
- Tools or resources provided
- Integrations or partnerships
- Technology stack if mentioned
- Unique capabilities
Be thorough and include everything mentioned]",
    "[If pricing is mentioned, provide complete details:
- All pricing tiers/plans with exact costs
- What's included in each plan
- Free trial information
- Payment terms and billing cycles
- Any discounts or promotions
- Enterprise or custom pricing options
- Comparison between plans
If NOT mentioned: \"Pricing information is not available on this page\"]",
    "[List all major sections, pages, and content areas:
- Main navigation menu items
- Footer sections
- Key landing pages or content hubs
- Resource sections (blog, docs, guides, etc.)
- Support or help sections
- Community or social features]",
    "[Include any company/organization details:
- Company name and background
- Location or headquarters
- Team information or leadership
- Company size or stats
- Founding date or history
- Mission and values]",
    "[List all trust indicators:
- Customer testimonials or reviews
- Case studies or success stories
- Client logos or partnerships
- Awards or certifications
- Press mentions or media coverage
- Statistics or metrics shared
- User counts or community size]",
    "[Provide all contact information:
- Email addresses
- Phone numbers
- Physical addresses
- Support channels (chat, email, phone)
- Social media links
- Contact forms or support portals]",
    "[List the main actions the website encourages:
- Primary CTAs (sign up, get started, etc.)
- Secondary CTAs
- Lead magnets or free offerings
- Newsletter or email signup
- Demo or trial requests]",
    "[Include any other relevant information:
- Technology or platform details
- Mobile app availability
- API or developer resources
- Privacy policy highlights
- Terms of service key points
- Compliance or certifications
- Any unique or notable features not covered above]",
    "[Provide a brief summary of the website's quality, design, and effectiveness]",
];

const INSTRUCTIONS: &str = "INSTRUCTIONS:
- Be extremely thorough and detailed in every section
- Extract ALL available information from the content
- Use PLAIN TEXT formatting only - NO markdown, NO asterisks, NO special formatting
- Use simple line breaks and spacing for structure
- Use CAPITAL LETTERS for section headers
- Use hyphens (-) or numbers (1, 2, 3) for lists
- If information for a section is not available, state \"Information not available on this page\"
- Make the output copy-paste friendly with proper formatting
- Include specific details, numbers, and quotes where relevant
- DO NOT use ** for bold, * for italic, or # for headers - use plain text only";

/// Build the report prompt for a page
///
/// The template is fixed; only `url` and `content` vary.
pub fn build_prompt(url: &str, content: &str) -> String {
    let mut prompt = String::with_capacity(content.len() + 6_000);

    prompt.push_str(&format!(
        "Analyze the following website from {} in extreme detail and provide a comprehensive, elaborate report.\n\n",
        url
    ));
    prompt.push_str(
        "Extract and present EVERYTHING about this website in the following format:\n\n",
    );
    prompt.push_str(SECTION_DIVIDER);
    prompt.push_str("\n\n");

    for (heading, guidance) in SECTION_HEADINGS.iter().zip(SECTION_GUIDANCE.iter()) {
        prompt.push_str(heading);
        prompt.push_str(":\n");
        prompt.push_str(guidance);
        prompt.push_str("\n\n");
        prompt.push_str(SECTION_DIVIDER);
        prompt.push_str("\n\n");
    }

    prompt.push_str("Website Content to Analyze:\n");
    prompt.push_str(content);
    prompt.push_str("\n\n");
    prompt.push_str(INSTRUCTIONS);
    prompt
}
